use foundation::ViewportExtent;
use foundation::math::{Coordinate, Projection};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ViewportError;
use crate::transform::CoordinateTransform;

/// Geographic rectangle of the view plus the zoom it was computed at.
///
/// Invariants: `south_west.lat <= north_east.lat` and `zoom > 0`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
    pub zoom: f64,
}

/// Corner strings as shown by the "current bounds" readout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundsReport {
    pub south_west: String,
    pub south_east: String,
    pub north_east: String,
    pub north_west: String,
    pub zoom: String,
}

/// Derives the geographic bounds of a projected viewport extent.
///
/// A missing or zero-size extent yields [`ViewportError::UnavailableExtent`],
/// never a degenerate box. Values are not rounded.
pub fn compute_bounds<P: Projection + ?Sized>(
    transform: &CoordinateTransform<'_, P>,
    extent: Option<ViewportExtent>,
    zoom: f64,
) -> Result<BoundingBox, ViewportError> {
    let extent = extent
        .filter(|e| e.is_usable())
        .ok_or(ViewportError::UnavailableExtent)?;
    if !(zoom.is_finite() && zoom > 0.0) {
        return Err(ViewportError::InvalidZoom(zoom));
    }

    Ok(BoundingBox {
        south_west: transform.to_geographic(extent.bottom_left()),
        north_east: transform.to_geographic(extent.top_right()),
        zoom,
    })
}

impl BoundingBox {
    pub fn center(&self) -> Coordinate {
        self.south_west.midpoint(self.north_east)
    }

    pub fn min_lon(&self) -> f64 {
        self.south_west.lon
    }

    pub fn min_lat(&self) -> f64 {
        self.south_west.lat
    }

    pub fn max_lon(&self) -> f64 {
        self.north_east.lon
    }

    pub fn max_lat(&self) -> f64 {
        self.north_east.lat
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        (self.min_lon()..=self.max_lon()).contains(&c.lon)
            && (self.min_lat()..=self.max_lat()).contains(&c.lat)
    }

    /// SW, SE, NE, NW.
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            self.south_west,
            Coordinate::new(self.max_lon(), self.min_lat()),
            self.north_east,
            Coordinate::new(self.min_lon(), self.max_lat()),
        ]
    }

    /// Corners as `"lat, lon"` with 4 decimals, zoom with 2.
    pub fn report(&self) -> BoundsReport {
        let [sw, se, ne, nw] = self.corners().map(|c| format!("{:.4}, {:.4}", c.lat, c.lon));
        BoundsReport {
            south_west: sw,
            south_east: se,
            north_east: ne,
            north_west: nw,
            zoom: format!("{:.2}", self.zoom),
        }
    }

    /// `min_lon`, `min_lat`, `max_lon`, `max_lat` query parameters.
    pub fn query_params(&self) -> [(&'static str, f64); 4] {
        [
            ("min_lon", self.min_lon()),
            ("min_lat", self.min_lat()),
            ("max_lon", self.max_lon()),
            ("max_lat", self.max_lat()),
        ]
    }

    /// Closed counter-clockwise lon/lat ring starting at the south-west corner.
    pub fn query_ring(&self) -> [[f64; 2]; 5] {
        [
            [self.min_lon(), self.min_lat()],
            [self.max_lon(), self.min_lat()],
            [self.max_lon(), self.max_lat()],
            [self.min_lon(), self.max_lat()],
            [self.min_lon(), self.min_lat()],
        ]
    }

    /// GeoJSON `Polygon` geometry covering the bounds.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [self.query_ring()],
        })
    }
}
