pub mod layer;
pub mod raster;
pub mod selection;
pub mod symbology;
pub mod vector;

pub use layer::*;
pub use selection::*;
