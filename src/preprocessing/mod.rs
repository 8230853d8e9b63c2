//! Pixel-level helpers that prepare rasters and photographs for analysis.

pub mod blobs;
pub mod ops;
pub mod pipeline;

pub use blobs::*;
pub use ops::*;
pub use pipeline::*;
