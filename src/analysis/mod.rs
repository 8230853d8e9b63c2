//! Row-wise correspondence between template and captured blob centroids,
//! the percentile-based defect rule, and the image-level analysis session.

pub mod analyzer;
pub mod classifier;
pub mod correspondence;
pub mod matching;
pub mod percentiles;
pub mod rows;

pub use analyzer::*;
pub use classifier::*;
pub use correspondence::*;
pub use matching::*;
pub use percentiles::*;
pub use rows::*;
