use foundation::ViewportExtent;
use foundation::math::{
    Coordinate, MERCATOR_HALF_SIZE, ProjectedPoint, Projection, Vec2, WebMercator,
};
use layers::raster::RasterLayer;
use layers::vector::OverlayLayer;
use layers::{BaseLayer, Layer, LayerId, OVERLAY_LAYER_ID};

use crate::events::ViewportEvent;
use crate::overlay::OverlayPolygon;

/// Tile edge length (pixels) of the base zoom level.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Map units per pixel at zoom 0 in Web Mercator.
pub const MAX_RESOLUTION: f64 = 2.0 * MERCATOR_HALF_SIZE / TILE_SIZE_PX;

/// What the viewport core needs from the thing that draws the map.
///
/// Projection math lives on the surface; the core only reaches it through
/// [`crate::CoordinateTransform`].
pub trait RenderSurface: Projection {
    /// Visible rectangle in projected units, `None` until the surface has a size.
    fn current_extent(&self) -> Option<ViewportExtent>;

    fn current_zoom(&self) -> f64;

    fn set_view(&mut self, center: ProjectedPoint, zoom: f64);

    fn set_visible(&mut self, layer: LayerId, visible: bool);

    /// Applies a batch of visibility flags before the next frame is drawn.
    fn set_visibility(&mut self, flags: &[(LayerId, bool)]) {
        for (layer, visible) in flags {
            self.set_visible(*layer, *visible);
        }
    }

    fn replace_geometry(&mut self, layer: LayerId, polygon: &OverlayPolygon);

    /// Detaches the surface from its target. Called once, on unmount.
    fn release(&mut self);
}

/// Off-screen surface: Web Mercator view with a pixel size and no pixels.
///
/// Computes extents the way a tiled web map does (resolution halves per zoom
/// level) and keeps the layer state the controller pushes to it.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size_px: [u32; 2],
    center: ProjectedPoint,
    zoom: f64,
    base_layers: Vec<RasterLayer>,
    overlay: OverlayLayer,
    /// Triangulated overlay interior, rebuilt on every geometry push.
    overlay_fill: Vec<Vec2>,
    visibility_batches: usize,
    released: bool,
}

impl HeadlessSurface {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            size_px: [width_px, height_px],
            center: Vec2::new(0.0, 0.0),
            zoom: 0.0,
            base_layers: BaseLayer::ALL.into_iter().map(BaseLayer::raster_layer).collect(),
            overlay: OverlayLayer::default(),
            overlay_fill: Vec::new(),
            visibility_batches: 0,
            released: false,
        }
    }

    pub fn resize(&mut self, width_px: u32, height_px: u32) {
        self.size_px = [width_px, height_px];
    }

    pub fn resolution(&self) -> f64 {
        MAX_RESOLUTION / 2f64.powf(self.zoom)
    }

    pub fn center(&self) -> Coordinate {
        WebMercator.unproject(self.center)
    }

    /// Simulates an interactive pan/zoom that settles at `center` and `zoom`,
    /// returning the move-end notification the controller should receive.
    pub fn pan_to(&mut self, center: Coordinate, zoom: f64) -> ViewportEvent {
        self.center = WebMercator.project(center);
        self.zoom = zoom;
        ViewportEvent::MoveEnd {
            extent: self.current_extent(),
            zoom: self.zoom,
        }
    }

    pub fn is_visible(&self, layer: LayerId) -> Option<bool> {
        if layer == self.overlay.id() {
            return Some(self.overlay.style.visible);
        }
        self.base_layers
            .iter()
            .find(|l| l.id() == layer)
            .map(|l| l.style.visible)
    }

    pub fn base_layer(&self, layer: BaseLayer) -> Option<&RasterLayer> {
        self.base_layers.iter().find(|l| l.id() == layer.layer_id())
    }

    pub fn overlay(&self) -> &OverlayLayer {
        &self.overlay
    }

    /// Fill mesh of the overlay, three vertices per triangle.
    pub fn overlay_fill(&self) -> &[Vec2] {
        &self.overlay_fill
    }

    pub fn visibility_batches(&self) -> usize {
        self.visibility_batches
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Projection for HeadlessSurface {
    fn project(&self, c: Coordinate) -> ProjectedPoint {
        WebMercator.project(c)
    }

    fn unproject(&self, p: ProjectedPoint) -> Coordinate {
        WebMercator.unproject(p)
    }
}

impl RenderSurface for HeadlessSurface {
    fn current_extent(&self) -> Option<ViewportExtent> {
        let [w, h] = self.size_px;
        if self.released || w == 0 || h == 0 {
            return None;
        }
        let res = self.resolution();
        Some(ViewportExtent::from_center_size(
            self.center,
            f64::from(w) * res,
            f64::from(h) * res,
        ))
    }

    fn current_zoom(&self) -> f64 {
        self.zoom
    }

    fn set_view(&mut self, center: ProjectedPoint, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    fn set_visible(&mut self, layer: LayerId, visible: bool) {
        if layer == OVERLAY_LAYER_ID {
            self.overlay.style.visible = visible;
            return;
        }
        if let Some(l) = self.base_layers.iter_mut().find(|l| l.id() == layer) {
            l.style.visible = visible;
        }
    }

    fn set_visibility(&mut self, flags: &[(LayerId, bool)]) {
        for (layer, visible) in flags {
            self.set_visible(*layer, *visible);
        }
        self.visibility_batches += 1;
    }

    fn replace_geometry(&mut self, layer: LayerId, polygon: &OverlayPolygon) {
        if layer != OVERLAY_LAYER_ID {
            return;
        }
        if polygon.is_empty() {
            self.overlay.clear();
        } else {
            self.overlay.replace(polygon.points());
        }
        self.overlay_fill = self.overlay.fill_triangles();
    }

    fn release(&mut self) {
        self.released = true;
    }
}
