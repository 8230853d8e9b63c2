//! Synthetic line rasters: settings, stroke geometry and rendering.

pub mod generator;
pub mod settings;

pub use generator::*;
pub use settings::*;
