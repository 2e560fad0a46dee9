use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis (meters). Web Mercator uses it as the sphere radius.
pub const WGS84_A: f64 = 6_378_137.0;

/// Latitude limit (degrees) of the square Web Mercator world.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Geographic coordinate in degrees.
///
/// Longitude comes first, matching GeoJSON and the `[lon, lat]` ordering used by
/// tile sources. Ranges are not enforced; callers that take raw user input
/// should check [`Coordinate::is_finite`] before storing one.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Finite, with lon in [-180, 180] and lat in [-90, 90].
    pub fn in_range(&self) -> bool {
        self.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Midpoint of the straight segment between two coordinates.
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.lon + other.lon) / 2.0, (self.lat + other.lat) / 2.0)
    }

    pub fn with_lon(self, lon: f64) -> Self {
        Self::new(lon, self.lat)
    }

    pub fn with_lat(self, lat: f64) -> Self {
        Self::new(self.lon, lat)
    }

    /// `[lon, lat]` pair as used in GeoJSON positions.
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}
