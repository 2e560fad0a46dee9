//! Viewport state synchronization for the map viewer.
//!
//! The [`ViewportController`] owns the canonical view state (center, zoom,
//! bounds, overlay, base layer) and keeps the bound [`RenderSurface`] in step
//! with it. Everything else in this crate is pure: coordinate transforms,
//! bounds derivation and overlay ring generation.

pub mod bounds;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod overlay;
pub mod state;
pub mod surface;
pub mod transform;

pub use bounds::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use events::*;
pub use overlay::*;
pub use state::*;
pub use surface::*;
pub use transform::*;
