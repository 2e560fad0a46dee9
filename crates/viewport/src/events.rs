use foundation::ViewportExtent;
use serde::{Deserialize, Serialize};

/// Inbound events handled by the [`crate::ViewportController`].
///
/// Coordinate field edits carry the raw field text; parsing and rejection are
/// the controller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewportEvent {
    /// An interactive pan/zoom settled.
    MoveEnd {
        extent: Option<ViewportExtent>,
        zoom: f64,
    },
    SetCenter {
        lon: f64,
        lat: f64,
    },
    LatitudeEdited {
        text: String,
    },
    LongitudeEdited {
        text: String,
    },
    ToggleOverlay,
    SelectLayer {
        id: String,
    },
    /// Manual "show current bounds" request.
    BoundsSnapshot,
}

impl ViewportEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ViewportEvent::MoveEnd { .. } => "move_end",
            ViewportEvent::SetCenter { .. } => "set_center",
            ViewportEvent::LatitudeEdited { .. } => "latitude_edited",
            ViewportEvent::LongitudeEdited { .. } => "longitude_edited",
            ViewportEvent::ToggleOverlay => "toggle_overlay",
            ViewportEvent::SelectLayer { .. } => "select_layer",
            ViewportEvent::BoundsSnapshot => "bounds_snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewportEvent;
    use pretty_assertions::assert_eq;

    #[test]
    fn events_parse_from_tagged_json() {
        let events: Vec<ViewportEvent> = serde_json::from_str(
            r#"[
                {"type": "toggle_overlay"},
                {"type": "select_layer", "id": "xyz"},
                {"type": "latitude_edited", "text": "27.72"},
                {"type": "move_end", "extent": null, "zoom": 14.0},
                {"type": "bounds_snapshot"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            events,
            vec![
                ViewportEvent::ToggleOverlay,
                ViewportEvent::SelectLayer { id: "xyz".into() },
                ViewportEvent::LatitudeEdited {
                    text: "27.72".into()
                },
                ViewportEvent::MoveEnd {
                    extent: None,
                    zoom: 14.0
                },
                ViewportEvent::BoundsSnapshot,
            ]
        );
        assert_eq!(events[1].kind(), "select_layer");
    }
}
