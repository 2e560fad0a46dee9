use foundation::math::{Coordinate, ProjectedPoint, Projection};
use serde::Serialize;
use serde_json::{Value, json};

use crate::transform::CoordinateTransform;

/// Half the overlay square's side in projected units (meters for Web Mercator).
pub const DEFAULT_OVERLAY_HALF_SIZE: f64 = 1000.0;

/// Closed square ring in projected space, or empty when the overlay is hidden.
///
/// Always replaced wholesale; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OverlayPolygon {
    ring: Vec<ProjectedPoint>,
}

/// Builds the axis-aligned square of half-size `half_size` centered on the
/// projection of `center`.
///
/// The square is square in projected space, not on the ground. Calling this
/// twice with the same inputs yields the same ring point for point.
pub fn generate_overlay<P: Projection + ?Sized>(
    transform: &CoordinateTransform<'_, P>,
    center: Coordinate,
    half_size: f64,
) -> OverlayPolygon {
    let c = transform.to_projected(center);
    let s = half_size;
    OverlayPolygon {
        ring: vec![
            ProjectedPoint::new(c.x - s, c.y - s),
            ProjectedPoint::new(c.x + s, c.y - s),
            ProjectedPoint::new(c.x + s, c.y + s),
            ProjectedPoint::new(c.x - s, c.y + s),
            ProjectedPoint::new(c.x - s, c.y - s),
        ],
    }
}

impl OverlayPolygon {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn points(&self) -> &[ProjectedPoint] {
        &self.ring
    }

    pub fn is_closed(&self) -> bool {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) => self.ring.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Mean of the distinct vertices (the closing point is not counted twice).
    pub fn centroid(&self) -> Option<ProjectedPoint> {
        let distinct = match self.ring.split_last() {
            Some((_, rest)) if self.is_closed() => rest,
            _ => &self.ring[..],
        };
        if distinct.is_empty() {
            return None;
        }
        let sum = distinct
            .iter()
            .fold(ProjectedPoint::new(0.0, 0.0), |acc, p| acc + *p);
        Some(sum.scale(1.0 / distinct.len() as f64))
    }

    /// GeoJSON `Polygon` geometry in lon/lat, or `null` when empty.
    pub fn to_geojson<P: Projection + ?Sized>(&self, transform: &CoordinateTransform<'_, P>) -> Value {
        if self.is_empty() {
            return Value::Null;
        }
        let ring: Vec<[f64; 2]> = self
            .ring
            .iter()
            .map(|p| transform.to_geographic(*p).to_array())
            .collect();
        json!({
            "type": "Polygon",
            "coordinates": [ring],
        })
    }
}
