use earcutr::earcut;
use foundation::math::Vec2;

use crate::layer::{Layer, LayerId, OVERLAY_LAYER_ID};
use crate::symbology::LayerStyle;

/// Vector layer holding the query overlay polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    id: LayerId,
    pub style: LayerStyle,
    ring: Vec<Vec2>,
}

impl Default for OverlayLayer {
    fn default() -> Self {
        Self::new(LayerStyle::overlay())
    }
}

impl OverlayLayer {
    pub fn new(style: LayerStyle) -> Self {
        Self {
            id: OVERLAY_LAYER_ID,
            style,
            ring: Vec::new(),
        }
    }

    /// Replaces the held ring wholesale.
    pub fn replace(&mut self, ring: &[Vec2]) {
        self.ring.clear();
        self.ring.extend_from_slice(ring);
    }

    pub fn clear(&mut self) {
        self.ring.clear();
    }

    pub fn ring(&self) -> &[Vec2] {
        &self.ring
    }

    /// Flat triangle list (3 vertices per triangle) covering the ring interior.
    pub fn fill_triangles(&self) -> Vec<Vec2> {
        triangulate_ring(&self.ring)
    }
}

impl Layer for OverlayLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

fn triangulate_ring(ring: &[Vec2]) -> Vec<Vec2> {
    if !ring.iter().all(Vec2::is_finite) {
        return Vec::new();
    }
    let mut points: Vec<Vec2> = ring.to_vec();
    drop_closing_duplicate(&mut points);
    if points.len() < 3 {
        return Vec::new();
    }

    // Triangulate relative to the first vertex; projected coordinates are in
    // the millions of meters and the ring is only a few kilometers wide.
    let origin = points[0];
    let mut coords_2d: Vec<f64> = Vec::with_capacity(points.len() * 2);
    for p in &points {
        let d = *p - origin;
        coords_2d.push(d.x);
        coords_2d.push(d.y);
    }

    let indices = match earcut(&coords_2d, &[], 2) {
        Ok(ix) => ix,
        Err(_) => return Vec::new(),
    };

    indices
        .into_iter()
        .filter_map(|idx| points.get(idx).copied())
        .collect()
}

fn drop_closing_duplicate(points: &mut Vec<Vec2>) {
    if points.len() >= 2 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (first.x - last.x).abs() < 1e-9 && (first.y - last.y).abs() < 1e-9 {
            points.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OverlayLayer;
    use foundation::math::Vec2;

    fn square(cx: f64, cy: f64, s: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(cx - s, cy - s),
            Vec2::new(cx + s, cy - s),
            Vec2::new(cx + s, cy + s),
            Vec2::new(cx - s, cy + s),
            Vec2::new(cx - s, cy - s),
        ]
    }

    fn triangle_area(t: &[Vec2]) -> f64 {
        ((t[1].x - t[0].x) * (t[2].y - t[0].y) - (t[2].x - t[0].x) * (t[1].y - t[0].y)).abs() / 2.0
    }

    #[test]
    fn closed_square_fills_with_two_triangles() {
        let mut layer = OverlayLayer::default();
        layer.replace(&square(9_498_224.0, 3_213_365.0, 1000.0));
        let tris = layer.fill_triangles();
        assert_eq!(tris.len(), 6);
        let area: f64 = tris.chunks(3).map(triangle_area).sum();
        assert!((area - 4_000_000.0).abs() < 1e-3, "area {area}");
    }

    #[test]
    fn empty_ring_has_no_fill() {
        let mut layer = OverlayLayer::default();
        layer.replace(&square(0.0, 0.0, 1.0));
        layer.clear();
        assert!(layer.ring().is_empty());
        assert!(layer.fill_triangles().is_empty());
    }

    #[test]
    fn non_finite_ring_has_no_fill() {
        let mut layer = OverlayLayer::default();
        let mut ring = square(0.0, 0.0, 1000.0);
        ring[1].x = f64::INFINITY;
        ring[2].x = f64::INFINITY;
        layer.replace(&ring);
        assert!(layer.fill_triangles().is_empty());

        ring[1].y = f64::NAN;
        layer.replace(&ring);
        assert!(layer.fill_triangles().is_empty());
    }
}
