//! Diagnostic posters for inspection results.

pub mod poster;

pub use poster::*;
