use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layer::{LayerId, OSM_LAYER_ID, SATELLITE_LAYER_ID};
use crate::raster::{RasterLayer, RasterSource, SATELLITE_TILE_TEMPLATE};

/// Mutually exclusive base map layers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum BaseLayer {
    #[default]
    #[serde(rename = "osm")]
    Osm,
    #[serde(rename = "xyz", alias = "satellite")]
    Satellite,
}

impl BaseLayer {
    pub const ALL: [BaseLayer; 2] = [BaseLayer::Osm, BaseLayer::Satellite];
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            BaseLayer::Osm => 0,
            BaseLayer::Satellite => 1,
        }
    }

    /// Id used by selection widgets and scripts.
    pub fn as_str(self) -> &'static str {
        match self {
            BaseLayer::Osm => "osm",
            BaseLayer::Satellite => "xyz",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BaseLayer::Osm => "OpenStreetMap",
            BaseLayer::Satellite => "Satellite Image",
        }
    }

    pub fn layer_id(self) -> LayerId {
        match self {
            BaseLayer::Osm => OSM_LAYER_ID,
            BaseLayer::Satellite => SATELLITE_LAYER_ID,
        }
    }

    pub fn raster_layer(self) -> RasterLayer {
        let source = match self {
            BaseLayer::Osm => RasterSource::Osm,
            BaseLayer::Satellite => RasterSource::Xyz {
                template: SATELLITE_TILE_TEMPLATE.to_string(),
            },
        };
        RasterLayer::new(self.layer_id(), source)
    }
}

impl std::fmt::Display for BaseLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayerError {
    pub id: String,
}

impl std::fmt::Display for UnknownLayerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown base layer id: {:?}", self.id)
    }
}

impl std::error::Error for UnknownLayerError {}

impl FromStr for BaseLayer {
    type Err = UnknownLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "osm" => Ok(BaseLayer::Osm),
            "xyz" | "satellite" => Ok(BaseLayer::Satellite),
            _ => Err(UnknownLayerError { id: s.to_string() }),
        }
    }
}

/// Closed selection over [`BaseLayer`]: exactly one visible flag is set.
///
/// The flag table is rebuilt and swapped in as a whole on every selection, so
/// there is no state with zero or two visible layers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerVisibility {
    selected: BaseLayer,
    visible: [bool; BaseLayer::COUNT],
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self::with_selected(BaseLayer::default())
    }
}

impl LayerVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selected(layer: BaseLayer) -> Self {
        let mut visible = [false; BaseLayer::COUNT];
        visible[layer.index()] = true;
        Self {
            selected: layer,
            visible,
        }
    }

    pub fn selected(&self) -> BaseLayer {
        self.selected
    }

    pub fn is_visible(&self, layer: BaseLayer) -> bool {
        self.visible[layer.index()]
    }

    /// Selects `layer`. Returns `true` if the selection changed.
    pub fn select(&mut self, layer: BaseLayer) -> bool {
        let changed = self.selected != layer;
        *self = Self::with_selected(layer);
        changed
    }

    /// Selects by string id. Unknown ids leave the selection untouched.
    pub fn select_id(&mut self, id: &str) -> Result<bool, UnknownLayerError> {
        let layer = id.parse::<BaseLayer>()?;
        Ok(self.select(layer))
    }

    /// `(layer, visible)` for every base layer, in [`BaseLayer::ALL`] order.
    pub fn flags(&self) -> impl Iterator<Item = (BaseLayer, bool)> + '_ {
        BaseLayer::ALL.into_iter().map(|l| (l, self.is_visible(l)))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}
