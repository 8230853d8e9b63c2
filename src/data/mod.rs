pub mod image_data;
pub mod loader;

pub use image_data::*;
pub use loader::*;
