pub mod analysis;
#[cfg(feature = "camera")]
pub mod camera;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod preprocessing;
pub mod raster;
pub mod storage;
pub mod visualization;

pub use analysis::*;
pub use data::*;
pub use error::InspectionError;
pub use geometry::{Point, Segment};
pub use raster::{generate, RasterGenerator, RasterSettings, WindowSettings};

pub type Result<T> = anyhow::Result<T>;
