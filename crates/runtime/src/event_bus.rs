use std::collections::VecDeque;

use serde::Serialize;

/// Inbound event channel.
///
/// Producers push immutable event records; a single owner pops them one at a
/// time and runs each to completion before taking the next. There is no
/// re-entrancy: handlers that produce follow-up events push them onto the same
/// queue.
#[derive(Debug)]
pub struct EventQueue<E> {
    pending: VecDeque<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: E) {
        self.pending.push_back(event);
    }

    pub fn pop(&mut self) -> Option<E> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Extend<E> for EventQueue<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.pending.extend(iter);
    }
}

/// Trace record of a handled event.
///
/// For now this is just structured text keyed by a monotonically increasing
/// sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            seq,
            kind,
            message: message.into(),
        });
        seq
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Takes the recorded events. Sequence numbers keep increasing afterwards.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventQueue};

    #[test]
    fn queue_is_fifo() {
        let mut q = EventQueue::new();
        q.push(1);
        q.extend([2, 3]);
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn records_events_with_sequence_numbers() {
        let mut bus = EventBus::new();
        assert_eq!(bus.emit("test", "hello"), 0);
        assert_eq!(bus.emit("test", "again"), 1);
        assert_eq!(bus.events().len(), 2);
        assert_eq!(bus.events()[1].seq, 1);
    }

    #[test]
    fn drain_clears_events_but_keeps_counting() {
        let mut bus = EventBus::new();
        bus.emit("k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
        assert_eq!(bus.emit("k", "n"), 1);
    }
}
