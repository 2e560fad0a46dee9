use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u64);

/// Stable ids of the layers the viewer composes, bottom to top.
pub const OSM_LAYER_ID: LayerId = LayerId(1);
pub const SATELLITE_LAYER_ID: LayerId = LayerId(2);
pub const OVERLAY_LAYER_ID: LayerId = LayerId(100);

pub trait Layer {
    fn id(&self) -> LayerId;
}
