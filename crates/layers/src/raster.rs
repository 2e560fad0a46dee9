use foundation::math::{Coordinate, MAX_MERCATOR_LAT};
use serde::{Deserialize, Serialize};

use crate::layer::{Layer, LayerId};
use crate::symbology::LayerStyle;

pub const OSM_TILE_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const SATELLITE_TILE_TEMPLATE: &str =
    "https://www.google.cn/maps/vt?lyrs=s@189&gl=cn&x={x}&y={y}&z={z}";

/// Where a raster layer pulls its tiles from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RasterSource {
    Osm,
    Xyz { template: String },
}

impl RasterSource {
    pub fn template(&self) -> &str {
        match self {
            RasterSource::Osm => OSM_TILE_TEMPLATE,
            RasterSource::Xyz { template } => template,
        }
    }

    /// Expands the `{z}`, `{x}` and `{y}` placeholders of the source template.
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        self.template()
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// Deepest zoom level tile indices are computed for.
pub const MAX_TILE_ZOOM: u32 = 30;

/// Slippy-map tile `(x, y)` containing `c` at zoom `z`, with `z` capped at
/// [`MAX_TILE_ZOOM`].
pub fn tile_index(c: Coordinate, z: u32) -> (u32, u32) {
    let n = 2f64.powi(z.min(MAX_TILE_ZOOM) as i32);
    let lat = c.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = ((c.lon + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * n).floor();
    let max = n - 1.0;
    (x.clamp(0.0, max) as u32, y.clamp(0.0, max) as u32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayer {
    id: LayerId,
    pub style: LayerStyle,
    pub source: RasterSource,
}

impl RasterLayer {
    pub fn new(id: LayerId, source: RasterSource) -> Self {
        Self {
            id,
            style: LayerStyle::default(),
            source,
        }
    }
}

impl Layer for RasterLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_TILE_ZOOM, RasterSource, SATELLITE_TILE_TEMPLATE, tile_index};
    use foundation::math::Coordinate;

    #[test]
    fn osm_urls_follow_slippy_map_layout() {
        assert_eq!(
            RasterSource::Osm.tile_url(15, 24149, 13721),
            "https://tile.openstreetmap.org/15/24149/13721.png"
        );
    }

    #[test]
    fn tile_index_matches_known_tiles() {
        assert_eq!(tile_index(Coordinate::new(0.0, 0.0), 0), (0, 0));
        assert_eq!(tile_index(Coordinate::new(0.0, 0.0), 1), (1, 1));
        assert_eq!(tile_index(Coordinate::new(85.324, 27.7172), 15), (24150, 13756));
        assert_eq!(tile_index(Coordinate::new(180.0, -90.0), 2), (3, 3));
    }

    #[test]
    fn huge_zoom_is_capped() {
        let c = Coordinate::new(85.324, 27.7172);
        assert_eq!(tile_index(c, 3_000_000_000), tile_index(c, MAX_TILE_ZOOM));
        assert_eq!(tile_index(c, u32::MAX), tile_index(c, MAX_TILE_ZOOM));
    }

    #[test]
    fn xyz_template_placeholders_expand_in_any_order() {
        let source = RasterSource::Xyz {
            template: SATELLITE_TILE_TEMPLATE.to_string(),
        };
        assert_eq!(
            source.tile_url(3, 5, 2),
            "https://www.google.cn/maps/vt?lyrs=s@189&gl=cn&x=5&y=2&z=3"
        );
    }
}
