//! Map projections.
//!
//! The viewer works in spherical Web Mercator (EPSG:3857), the projection used by
//! OSM and XYZ raster tiles. Projected units are meters at the equator.

use super::{Coordinate, MAX_MERCATOR_LAT, Vec2, WGS84_A};

/// Point in a projection's planar coordinate space.
pub type ProjectedPoint = Vec2;

/// Half the width of the Web Mercator world square (meters).
pub const MERCATOR_HALF_SIZE: f64 = std::f64::consts::PI * WGS84_A;

pub trait Projection {
    fn project(&self, c: Coordinate) -> ProjectedPoint;
    fn unproject(&self, p: ProjectedPoint) -> Coordinate;
}

/// Spherical Web Mercator.
///
/// Latitudes beyond [`MAX_MERCATOR_LAT`] are clamped before projecting so the
/// result stays inside the world square and is always finite.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn project(&self, c: Coordinate) -> ProjectedPoint {
        let lat = c.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let x = WGS84_A * c.lon.to_radians();
        let y = WGS84_A * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        Vec2::new(x, y)
    }

    fn unproject(&self, p: ProjectedPoint) -> Coordinate {
        let lon = (p.x / WGS84_A).to_degrees();
        let lat = (2.0 * (p.y / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
        Coordinate::new(lon, lat)
    }
}
