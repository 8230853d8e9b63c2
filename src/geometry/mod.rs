//! Plane geometry shared by raster generation and point analysis.

pub mod point;
pub mod segment;

pub use point::*;
pub use segment::*;
