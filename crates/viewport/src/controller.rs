use foundation::ViewportExtent;
use foundation::math::Coordinate;
use layers::{BaseLayer, LayerId, OVERLAY_LAYER_ID};
use runtime::{Event, EventBus, EventQueue, Metrics};
use tracing::{debug, info};

use crate::bounds::{BoundingBox, compute_bounds};
use crate::config::ViewportConfig;
use crate::error::ViewportError;
use crate::events::ViewportEvent;
use crate::overlay::{OverlayPolygon, generate_overlay};
use crate::state::{ViewportSnapshot, ViewportState};
use crate::surface::RenderSurface;
use crate::transform::CoordinateTransform;

/// Owner of the canonical [`ViewportState`] and of the surface binding.
///
/// Every handler runs to completion and pushes its result to the surface before
/// returning, so the surface never shows an overlay built from a stale center
/// or a half-applied base layer switch. Invalid input is rejected locally: the
/// state is left as it was, the rejection is logged at `debug` and counted.
///
/// The surface is released exactly once, by [`ViewportController::unmount`] or
/// on drop.
pub struct ViewportController<S: RenderSurface> {
    surface: Option<S>,
    config: ViewportConfig,
    state: ViewportState,
    events: EventBus,
    metrics: Metrics,
}

impl<S: RenderSurface> ViewportController<S> {
    /// Binds `surface` and pushes the initial view, base layer flags and an
    /// empty overlay to it. Out-of-range config fields are replaced by their
    /// defaults.
    pub fn mount(mut surface: S, config: ViewportConfig) -> Self {
        let config = config.sanitized();
        let state = ViewportState::new(config.center, config.zoom, config.base_layer);

        let center = CoordinateTransform::new(&surface).to_projected(state.center);
        surface.set_view(center, state.zoom);
        surface.set_visibility(&visibility_flags(&state));
        surface.set_visible(OVERLAY_LAYER_ID, config.overlay_style.visible);
        surface.replace_geometry(OVERLAY_LAYER_ID, &state.overlay);

        info!(
            "viewport mounted at lon={} lat={} zoom={} layer={}",
            state.center.lon,
            state.center.lat,
            state.zoom,
            state.selected_layer()
        );

        let mut events = EventBus::new();
        events.emit("mount", format!("layer={}", state.selected_layer()));

        Self {
            surface: Some(surface),
            config,
            state,
            events,
            metrics: Metrics::new(),
        }
    }

    /// Releases the surface binding and hands the surface back.
    pub fn unmount(mut self) -> Option<S> {
        let mut surface = self.surface.take()?;
        surface.release();
        info!("viewport unmounted");
        Some(surface)
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot::from(&self.state)
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Direct surface access for the host that drives it (resizes, user
    /// pans). State changes still arrive through events.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn event_log(&self) -> &[Event] {
        self.events.events()
    }

    /// Hands over the event log recorded so far and starts a fresh one.
    pub fn drain_event_log(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Move-end notification: records the zoom and recomputes bounds.
    ///
    /// The center is not moved. A positive finite zoom is stored even when the
    /// extent is unavailable; the previous bounds are kept in that case.
    pub fn on_viewport_moved(
        &mut self,
        extent: Option<ViewportExtent>,
        zoom: f64,
    ) -> Result<BoundingBox, ViewportError> {
        let Some(surface) = self.surface.as_ref() else {
            return Err(ViewportError::UnavailableExtent);
        };
        let bounds = compute_bounds(&CoordinateTransform::new(surface), extent, zoom);
        if zoom.is_finite() && zoom > 0.0 {
            self.state.zoom = zoom;
        }
        let bounds = self.reject_on_err(bounds)?;

        self.state.bounds = Some(bounds);
        self.metrics.inc_counter("viewport.moved", 1);
        if !bounds.contains(self.state.center) {
            debug!("center is outside the visible bounds");
        }
        if self.state.overlay_visible {
            self.refresh_overlay();
        }
        Ok(bounds)
    }

    /// Moves the center. Coordinates outside lon [-180, 180] and
    /// lat [-90, 90], or that do not project to a finite point, are ignored.
    pub fn set_center(&mut self, center: Coordinate) -> Result<(), ViewportError> {
        let projects = self
            .surface
            .as_ref()
            .is_none_or(|s| CoordinateTransform::new(s).to_projected(center).is_finite());
        if !center.in_range() || !projects {
            return self.reject(ViewportError::InvalidCoordinate {
                lon: center.lon,
                lat: center.lat,
            });
        }
        self.state.center = center;
        self.metrics.inc_counter("viewport.center_set", 1);
        if self.state.overlay_visible {
            self.refresh_overlay();
        }
        Ok(())
    }

    pub fn set_latitude(&mut self, lat: f64) -> Result<(), ViewportError> {
        self.set_center(self.state.center.with_lat(lat))
    }

    pub fn set_longitude(&mut self, lon: f64) -> Result<(), ViewportError> {
        self.set_center(self.state.center.with_lon(lon))
    }

    /// Latitude field edit with the raw field text.
    pub fn set_latitude_text(&mut self, text: &str) -> Result<(), ViewportError> {
        let lat = self.parse_field(text)?;
        self.set_latitude(lat)
    }

    /// Longitude field edit with the raw field text.
    pub fn set_longitude_text(&mut self, text: &str) -> Result<(), ViewportError> {
        let lon = self.parse_field(text)?;
        self.set_longitude(lon)
    }

    /// Shows or hides the overlay. Returns the new visibility.
    pub fn toggle_overlay(&mut self) -> bool {
        self.state.overlay_visible = !self.state.overlay_visible;
        self.refresh_overlay();
        debug!("overlay visible={}", self.state.overlay_visible);
        self.state.overlay_visible
    }

    pub fn select_layer(&mut self, layer: BaseLayer) {
        let changed = self.state.layers.select(layer);
        self.push_layers(changed);
    }

    /// Selects by id (`"osm"`, `"xyz"`). Unknown ids change nothing.
    pub fn select_layer_id(&mut self, id: &str) -> Result<(), ViewportError> {
        match self.state.layers.select_id(id) {
            Ok(changed) => {
                self.push_layers(changed);
                Ok(())
            }
            Err(e) => self.reject(e.into()),
        }
    }

    /// On-demand bounds from the surface's current extent.
    ///
    /// Unlike a move event this also recenters: the new center is the midpoint
    /// of the bounds, and the overlay follows it.
    pub fn compute_bounds_snapshot(&mut self) -> Result<BoundingBox, ViewportError> {
        let Some(surface) = self.surface.as_ref() else {
            return Err(ViewportError::UnavailableExtent);
        };
        let zoom = surface.current_zoom();
        let bounds = compute_bounds(
            &CoordinateTransform::new(surface),
            surface.current_extent(),
            zoom,
        );
        let bounds = self.reject_on_err(bounds)?;

        self.state.zoom = zoom;
        self.state.bounds = Some(bounds);
        self.state.center = bounds.center();
        if self.state.overlay_visible {
            self.refresh_overlay();
        }
        self.metrics.inc_counter("viewport.bounds_snapshot", 1);

        let report = bounds.report();
        info!(
            "current map bounds: sw=({}) se=({}) ne=({}) nw=({}) zoom={}",
            report.south_west, report.south_east, report.north_east, report.north_west, report.zoom
        );
        Ok(bounds)
    }

    /// Applies one event.
    pub fn handle(&mut self, event: ViewportEvent) -> Result<(), ViewportError> {
        let kind = event.kind();
        let result = match event {
            ViewportEvent::MoveEnd { extent, zoom } => self.on_viewport_moved(extent, zoom).map(drop),
            ViewportEvent::SetCenter { lon, lat } => self.set_center(Coordinate::new(lon, lat)),
            ViewportEvent::LatitudeEdited { text } => self.set_latitude_text(&text),
            ViewportEvent::LongitudeEdited { text } => self.set_longitude_text(&text),
            ViewportEvent::ToggleOverlay => {
                self.toggle_overlay();
                Ok(())
            }
            ViewportEvent::SelectLayer { id } => self.select_layer_id(&id),
            ViewportEvent::BoundsSnapshot => self.compute_bounds_snapshot().map(drop),
        };

        let message = match &result {
            Ok(()) => "ok".to_string(),
            Err(e) => format!("rejected: {e}"),
        };
        self.events.emit(kind, message);
        self.metrics.inc_counter("viewport.events", 1);
        result
    }

    /// Drains `queue`, handling events in order. Rejections are already
    /// logged and counted by the handlers, so they do not stop the drain.
    /// Returns the number of events handled.
    pub fn process(&mut self, queue: &mut EventQueue<ViewportEvent>) -> usize {
        let mut handled = 0;
        while let Some(event) = queue.pop() {
            let _ = self.handle(event);
            handled += 1;
        }
        handled
    }

    fn parse_field(&mut self, text: &str) -> Result<f64, ViewportError> {
        match text.trim().parse::<f64>() {
            Ok(v) => Ok(v),
            Err(_) => self.reject(ViewportError::InvalidInput(text.to_string())),
        }
    }

    /// Sends the whole base layer flag table to the surface as one batch.
    fn push_layers(&mut self, changed: bool) {
        if changed {
            debug!("base layer -> {}", self.state.selected_layer());
        }
        let flags = visibility_flags(&self.state);
        if let Some(surface) = self.surface.as_mut() {
            surface.set_visibility(&flags);
        }
        self.metrics.inc_counter("viewport.layer_selected", 1);
    }

    /// Rebuilds the overlay from the current center and pushes it.
    fn refresh_overlay(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let overlay = if self.state.overlay_visible {
            generate_overlay(
                &CoordinateTransform::new(&*surface),
                self.state.center,
                self.config.overlay_half_size,
            )
        } else {
            OverlayPolygon::empty()
        };
        surface.replace_geometry(OVERLAY_LAYER_ID, &overlay);
        self.metrics
            .set_gauge("viewport.overlay_points", overlay.points().len() as i64);
        self.state.overlay = overlay;
    }

    fn reject<T>(&mut self, err: ViewportError) -> Result<T, ViewportError> {
        debug!("ignoring input: {err}");
        self.metrics
            .inc_counter(format!("viewport.rejected.{}", err.kind()), 1);
        Err(err)
    }

    fn reject_on_err<T>(&mut self, result: Result<T, ViewportError>) -> Result<T, ViewportError> {
        match result {
            Ok(v) => Ok(v),
            Err(e) => self.reject(e),
        }
    }
}

impl<S: RenderSurface> Drop for ViewportController<S> {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            debug!("viewport dropped, surface released");
        }
    }
}

fn visibility_flags(state: &ViewportState) -> Vec<(LayerId, bool)> {
    state
        .layers
        .flags()
        .map(|(layer, visible)| (layer.layer_id(), visible))
        .collect()
}
