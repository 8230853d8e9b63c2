use super::ops::{crop_top, resize, smooth_with, threshold, Interpolation};
use crate::data::{ImageData, SourceType};
use crate::raster::WindowSettings;
use crate::Result;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One step of photograph preprocessing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PreprocessOp {
    Threshold { cutoff: u8 },
    CropTop { rows: u32 },
    Resize { width: u32, height: u32, interpolation: Interpolation },
    GaussianBlur { sigma: f32 },
}

/// Ordered list of operations turning a RAW photograph into a PROCESSED image
#[derive(Debug, Clone, Default)]
pub struct PreprocessingStage {
    operations: Vec<PreprocessOp>,
}

impl PreprocessingStage {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Threshold, crop the top rows, then resize to the viewport
    pub fn standard(cutoff: u8, top_offset: u32, window: &WindowSettings) -> Self {
        let mut stage = Self::new().add_operation(PreprocessOp::Threshold { cutoff });
        if top_offset > 0 {
            stage = stage.add_operation(PreprocessOp::CropTop { rows: top_offset });
        }
        stage.add_operation(PreprocessOp::Resize {
            width: window.width,
            height: window.height,
            interpolation: Interpolation::Linear,
        })
    }

    pub fn add_operation(mut self, op: PreprocessOp) -> Self {
        self.operations.push(op);
        self
    }

    pub fn operations(&self) -> &[PreprocessOp] {
        &self.operations
    }

    pub fn stage_name(&self) -> &str {
        "Preprocessing"
    }

    pub fn execute(&self, input: &ImageData) -> Result<ImageData> {
        input.require("preprocessing", &[SourceType::Raw])?;

        let mut image = input.image().clone();
        for op in &self.operations {
            image = self.apply_operation(image, op)?;
            debug!(?op, width = image.width(), height = image.height(), "Preprocessing step applied");
        }
        Ok(ImageData::new(image, SourceType::Processed))
    }

    fn apply_operation(&self, image: DynamicImage, op: &PreprocessOp) -> Result<DynamicImage> {
        match op {
            PreprocessOp::Threshold { cutoff } => Ok(DynamicImage::ImageLuma8(threshold(&image, *cutoff))),
            PreprocessOp::CropTop { rows } => crop_top(&image, *rows),
            PreprocessOp::Resize {
                width,
                height,
                interpolation,
            } => Ok(resize(&image, *width, *height, *interpolation)),
            PreprocessOp::GaussianBlur { sigma } => Ok(smooth_with(&image, *sigma)),
        }
    }
}

/// Standard photograph preparation: threshold, crop, resize to the viewport
pub fn process_raw(raw: &ImageData, cutoff: u8, top_offset: u32, window: &WindowSettings) -> Result<ImageData> {
    PreprocessingStage::standard(cutoff, top_offset, window).execute(raw)
}

/// Nearest-neighbour rescale of a RAW image, keeping its tag
pub fn resize_raw(raw: &ImageData, window: &WindowSettings) -> Result<ImageData> {
    raw.require("resize", &[SourceType::Raw])?;
    let resized = resize(raw.image(), window.width, window.height, Interpolation::Nearest);
    Ok(ImageData::new(resized, SourceType::Raw))
}
