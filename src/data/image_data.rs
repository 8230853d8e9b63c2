use crate::error::InspectionError;
use image::{DynamicImage, GrayImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provenance of an image flowing through the inspection pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Photograph straight from the camera or disk
    Raw,
    /// Synthetic raster produced by the generator
    Raster,
    /// Thresholded/cropped/masked image ready for analysis
    Processed,
    /// Derived output such as a poster, not accepted by any stage
    None,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceType::Raw => "raw",
            SourceType::Raster => "raster",
            SourceType::Processed => "processed",
            SourceType::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for SourceType {
    type Err = InspectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(SourceType::Raw),
            "raster" => Ok(SourceType::Raster),
            "process" | "processed" => Ok(SourceType::Processed),
            "none" => Ok(SourceType::None),
            _ => Err(InspectionError::UnknownSourceTag(s.to_string())),
        }
    }
}

/// An image together with the tag describing where it came from
#[derive(Debug, Clone)]
pub struct ImageData {
    image: DynamicImage,
    source: SourceType,
}

impl ImageData {
    pub fn new(image: impl Into<DynamicImage>, source: SourceType) -> Self {
        Self {
            image: image.into(),
            source,
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn source(&self) -> SourceType {
        self.source
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn is_color(&self) -> bool {
        self.image.color().channel_count() > 2
    }

    pub fn to_luma8(&self) -> GrayImage {
        self.image.to_luma8()
    }

    /// Fail unless this image carries one of the `accepted` tags
    pub fn require(
        &self,
        operation: &'static str,
        accepted: &[SourceType],
    ) -> Result<&Self, InspectionError> {
        if accepted.contains(&self.source) {
            Ok(self)
        } else {
            Err(InspectionError::InvalidSource {
                operation,
                expected: accepted.to_vec(),
                actual: self.source,
            })
        }
    }
}
