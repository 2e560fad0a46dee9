use std::env;

use foundation::math::Coordinate;
use layers::BaseLayer;
use layers::raster::MAX_TILE_ZOOM;
use layers::symbology::LayerStyle;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ViewportError;
use crate::overlay::DEFAULT_OVERLAY_HALF_SIZE;

/// Kathmandu, the viewer's home view.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(85.3240, 27.7172);
pub const DEFAULT_ZOOM: f64 = 15.0;
pub const MAX_ZOOM: f64 = MAX_TILE_ZOOM as f64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub center: Coordinate,
    pub zoom: f64,
    /// Half the side of the overlay square, in projected units (meters).
    pub overlay_half_size: f64,
    pub base_layer: BaseLayer,
    pub overlay_style: LayerStyle,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            overlay_half_size: DEFAULT_OVERLAY_HALF_SIZE,
            base_layer: BaseLayer::Osm,
            overlay_style: LayerStyle::overlay(),
        }
    }
}

fn valid_lon(v: f64) -> bool {
    (-180.0..=180.0).contains(&v)
}

fn valid_lat(v: f64) -> bool {
    (-90.0..=90.0).contains(&v)
}

fn valid_zoom(v: f64) -> bool {
    v > 0.0 && v <= MAX_ZOOM
}

fn valid_half_size(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl ViewportConfig {
    /// Defaults overridden by `VIEWPORT_*` environment variables.
    ///
    /// Values that do not parse, or fall outside their valid range, are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str, default: f64, valid: fn(f64) -> bool| {
            parse_f64(key, lookup(key).as_deref(), default, valid)
        };
        let lon = var("VIEWPORT_CENTER_LON", defaults.center.lon, valid_lon);
        let lat = var("VIEWPORT_CENTER_LAT", defaults.center.lat, valid_lat);
        let zoom = var("VIEWPORT_ZOOM", defaults.zoom, valid_zoom);
        let overlay_half_size = var(
            "VIEWPORT_OVERLAY_HALF_SIZE",
            defaults.overlay_half_size,
            valid_half_size,
        );
        let base_layer = parse_layer(
            "VIEWPORT_BASE_LAYER",
            lookup("VIEWPORT_BASE_LAYER").as_deref(),
            defaults.base_layer,
        );

        Self {
            center: Coordinate::new(lon, lat),
            zoom,
            overlay_half_size,
            base_layer,
            overlay_style: defaults.overlay_style,
        }
    }

    /// Checks the same ranges [`ViewportConfig::from_env`] enforces.
    pub fn validate(&self) -> Result<(), ViewportError> {
        let c = self.center;
        if !(valid_lon(c.lon) && valid_lat(c.lat)) {
            return Err(ViewportError::InvalidCoordinate {
                lon: c.lon,
                lat: c.lat,
            });
        }
        if !valid_zoom(self.zoom) {
            return Err(ViewportError::InvalidZoom(self.zoom));
        }
        if !valid_half_size(self.overlay_half_size) {
            return Err(ViewportError::InvalidInput(format!(
                "overlay_half_size={}",
                self.overlay_half_size
            )));
        }
        Ok(())
    }

    /// Replaces each out-of-range field with its default, warning once per
    /// field.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let keep = |name: &str, v: f64, default: f64, valid: fn(f64) -> bool| {
            if valid(v) {
                v
            } else {
                warn!("ignoring config {name}={v}, using {default}");
                default
            }
        };
        Self {
            center: Coordinate::new(
                keep("center.lon", self.center.lon, defaults.center.lon, valid_lon),
                keep("center.lat", self.center.lat, defaults.center.lat, valid_lat),
            ),
            zoom: keep("zoom", self.zoom, defaults.zoom, valid_zoom),
            overlay_half_size: keep(
                "overlay_half_size",
                self.overlay_half_size,
                defaults.overlay_half_size,
                valid_half_size,
            ),
            ..self
        }
    }
}

/// Parses one numeric setting. `None` means unset; anything that does not
/// parse to a finite value accepted by `valid` falls back to `default`.
fn parse_f64(key: &str, raw: Option<&str>, default: f64, valid: fn(f64) -> bool) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && valid(v) => v,
        _ => {
            warn!("ignoring {key}={raw:?}, using {default}");
            default
        }
    }
}

fn parse_layer(key: &str, raw: Option<&str>, default: BaseLayer) -> BaseLayer {
    let Some(raw) = raw else {
        return default;
    };
    raw.parse().unwrap_or_else(|e| {
        warn!("ignoring {key}: {e}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_CENTER, DEFAULT_ZOOM, ViewportConfig, parse_f64, parse_layer, valid_lat,
        valid_zoom,
    };
    use crate::error::ViewportError;
    use foundation::math::Coordinate;
    use layers::BaseLayer;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_home_view() {
        let c = ViewportConfig::default();
        assert_eq!(c.center, DEFAULT_CENTER);
        assert_eq!(c.zoom, 15.0);
        assert_eq!(c.overlay_half_size, 1000.0);
        assert_eq!(c.base_layer, BaseLayer::Osm);
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn numeric_settings_fall_back_on_bad_values() {
        assert_eq!(parse_f64("K", None, 3.5, valid_lat), 3.5);
        assert_eq!(parse_f64("K", Some(" 27.5 "), 3.5, valid_lat), 27.5);
        assert_eq!(parse_f64("K", Some("north"), 3.5, valid_lat), 3.5);
        assert_eq!(parse_f64("K", Some("NaN"), 3.5, valid_lat), 3.5);
        assert_eq!(parse_f64("K", Some("inf"), 3.5, |_| true), 3.5);
        assert_eq!(parse_f64("K", Some("91"), 3.5, valid_lat), 3.5);
        assert_eq!(parse_f64("K", Some("0"), 15.0, valid_zoom), 15.0);
        assert_eq!(parse_f64("K", Some("-2"), 15.0, valid_zoom), 15.0);
        assert_eq!(parse_f64("K", Some("3e9"), 15.0, valid_zoom), 15.0);
    }

    #[test]
    fn unknown_layer_falls_back() {
        assert_eq!(parse_layer("K", Some("terrain"), BaseLayer::Osm), BaseLayer::Osm);
        assert_eq!(parse_layer("K", Some("xyz"), BaseLayer::Osm), BaseLayer::Satellite);
        assert_eq!(parse_layer("K", None, BaseLayer::Satellite), BaseLayer::Satellite);
    }

    #[test]
    fn lookup_mixes_valid_and_rejected_values() {
        let vars: HashMap<&str, &str> = [
            ("VIEWPORT_CENTER_LON", "86.0"),
            ("VIEWPORT_CENTER_LAT", "123"),
            ("VIEWPORT_ZOOM", "0"),
            ("VIEWPORT_OVERLAY_HALF_SIZE", "250"),
            ("VIEWPORT_BASE_LAYER", "bogus"),
        ]
        .into_iter()
        .collect();
        let c = ViewportConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(c.center, Coordinate::new(86.0, DEFAULT_CENTER.lat));
        assert_eq!(c.zoom, DEFAULT_ZOOM);
        assert_eq!(c.overlay_half_size, 250.0);
        assert_eq!(c.base_layer, BaseLayer::Osm);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let c: ViewportConfig =
            serde_json::from_str(r#"{ "zoom": 12.5, "base_layer": "satellite" }"#).unwrap();
        assert_eq!(c.zoom, 12.5);
        assert_eq!(c.base_layer, BaseLayer::Satellite);
        assert_eq!(c.center, DEFAULT_CENTER);
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let bad_center = ViewportConfig {
            center: Coordinate::new(1e308, 27.0),
            ..ViewportConfig::default()
        };
        assert!(matches!(
            bad_center.validate(),
            Err(ViewportError::InvalidCoordinate { .. })
        ));

        let bad_zoom = ViewportConfig {
            zoom: 3e9,
            ..ViewportConfig::default()
        };
        assert_eq!(bad_zoom.validate(), Err(ViewportError::InvalidZoom(3e9)));

        let bad_half = ViewportConfig {
            overlay_half_size: -1.0,
            ..ViewportConfig::default()
        };
        assert!(matches!(bad_half.validate(), Err(ViewportError::InvalidInput(_))));
    }

    #[test]
    fn sanitized_resets_only_bad_fields() {
        let c = ViewportConfig {
            center: Coordinate::new(f64::NAN, 28.0),
            zoom: 3e9,
            overlay_half_size: 500.0,
            base_layer: BaseLayer::Satellite,
            ..ViewportConfig::default()
        }
        .sanitized();
        assert_eq!(c.center, Coordinate::new(DEFAULT_CENTER.lon, 28.0));
        assert_eq!(c.zoom, DEFAULT_ZOOM);
        assert_eq!(c.overlay_half_size, 500.0);
        assert_eq!(c.base_layer, BaseLayer::Satellite);
        assert_eq!(c.validate(), Ok(()));
    }
}
