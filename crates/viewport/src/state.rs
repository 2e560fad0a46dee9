use foundation::math::Coordinate;
use layers::{BaseLayer, LayerVisibility};
use serde::Serialize;

use crate::bounds::{BoundingBox, BoundsReport};
use crate::overlay::OverlayPolygon;

/// Canonical view state. Only the controller mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub center: Coordinate,
    pub zoom: f64,
    /// `None` until the first usable extent has been seen.
    pub bounds: Option<BoundingBox>,
    pub overlay_visible: bool,
    pub overlay: OverlayPolygon,
    pub layers: LayerVisibility,
}

impl ViewportState {
    pub fn new(center: Coordinate, zoom: f64, base_layer: BaseLayer) -> Self {
        Self {
            center,
            zoom,
            bounds: None,
            overlay_visible: false,
            overlay: OverlayPolygon::empty(),
            layers: LayerVisibility::with_selected(base_layer),
        }
    }

    pub fn selected_layer(&self) -> BaseLayer {
        self.layers.selected()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerFlag {
    pub id: &'static str,
    pub label: &'static str,
    pub visible: bool,
}

/// Read-only copy of the state for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportSnapshot {
    pub center: Coordinate,
    pub zoom: f64,
    pub bounds: Option<BoundingBox>,
    pub bounds_report: Option<BoundsReport>,
    pub overlay_visible: bool,
    pub overlay: OverlayPolygon,
    pub selected_layer: BaseLayer,
    pub layers: Vec<LayerFlag>,
}

impl From<&ViewportState> for ViewportSnapshot {
    fn from(state: &ViewportState) -> Self {
        Self {
            center: state.center,
            zoom: state.zoom,
            bounds: state.bounds,
            bounds_report: state.bounds.as_ref().map(BoundingBox::report),
            overlay_visible: state.overlay_visible,
            overlay: state.overlay.clone(),
            selected_layer: state.selected_layer(),
            layers: state
                .layers
                .flags()
                .map(|(layer, visible)| LayerFlag {
                    id: layer.as_str(),
                    label: layer.label(),
                    visible,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewportSnapshot, ViewportState};
    use foundation::math::Coordinate;
    use layers::BaseLayer;
    use serde_json::json;

    #[test]
    fn fresh_state_has_no_bounds_and_hidden_overlay() {
        let s = ViewportState::new(Coordinate::new(85.324, 27.7172), 15.0, BaseLayer::Osm);
        assert!(s.bounds.is_none());
        assert!(!s.overlay_visible);
        assert!(s.overlay.is_empty());
        assert_eq!(s.selected_layer(), BaseLayer::Osm);
    }

    #[test]
    fn snapshot_serializes_for_display() {
        let s = ViewportState::new(Coordinate::new(85.324, 27.7172), 15.0, BaseLayer::Satellite);
        let v = serde_json::to_value(ViewportSnapshot::from(&s)).unwrap();
        assert_eq!(v["center"], json!({ "lon": 85.324, "lat": 27.7172 }));
        assert_eq!(v["bounds"], json!(null));
        assert_eq!(v["overlay"], json!([]));
        assert_eq!(v["selected_layer"], json!("xyz"));
        assert_eq!(
            v["layers"],
            json!([
                { "id": "osm", "label": "OpenStreetMap", "visible": false },
                { "id": "xyz", "label": "Satellite Image", "visible": true }
            ])
        );
    }
}
