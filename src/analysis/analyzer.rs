use super::classifier::{classify, verdict_message};
use super::correspondence::{analyze, AnalysisResult};
use super::percentiles::Percentiles;
use crate::data::{ImageData, SourceType};
use crate::error::InspectionError;
use crate::geometry::Point;
use crate::logging::{new_correlation_id, InspectionSpan};
use crate::preprocessing::{extract_centroids, mask, resize, threshold, Interpolation};
use crate::visualization::{render_with, PosterOptions};
use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side length every image is brought to before masking
pub const WORKING_RESOLUTION: u32 = 1000;

/// Binarization cutoff for color photographs and for resampled images
pub const BINARY_CUTOFF: u8 = 127;

/// Serializable outcome of one inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub correlation_id: Uuid,
    pub template_points: usize,
    pub captured_points: usize,
    pub rows: usize,
    pub records: usize,
    pub percentiles: Percentiles,
    /// `p99 / p50`; absent when the median distance is zero
    pub tail_ratio: Option<f64>,
    pub deformed: bool,
    pub message: String,
}

/// Compares a processed photograph against a pair of synthetic rasters.
///
/// The template is the base raster masked by the overlay raster; the captured
/// image is the processed photograph masked by the same overlay. Blob
/// centroids of both are matched row by row.
#[derive(Debug, Clone)]
pub struct Analyzer {
    correlation_id: Uuid,
    template_image: GrayImage,
    captured_image: GrayImage,
    result: AnalysisResult,
}

impl Analyzer {
    pub fn new(
        base_raster: &ImageData,
        over_raster: &ImageData,
        processed: &ImageData,
    ) -> Result<Self, InspectionError> {
        base_raster.require("analysis base raster", &[SourceType::Raster])?;
        over_raster.require("analysis overlay raster", &[SourceType::Raster])?;
        processed.require("analysis photograph", &[SourceType::Processed])?;

        let correlation_id = new_correlation_id();
        let span = InspectionSpan::new("analysis", Some(correlation_id));
        let _enter = span.enter();

        let base = normalize_raster(base_raster);
        let over = normalize_raster(over_raster);
        let photo = normalize_photo(processed);

        let template_image = mask(&base, &over)?;
        let captured_image = mask(&photo, &over)?;

        let template_points = extract_centroids(&template_image).centers;
        let captured_points = extract_centroids(&captured_image).centers;
        span.record_points(template_points.len(), captured_points.len());

        let result = analyze(&template_points, &captured_points)?;
        span.record_matching(result.bands().len(), result.records().len());
        span.record_verdict(&result.percentiles(), result.is_deformed());

        Ok(Self {
            correlation_id,
            template_image,
            captured_image,
            result,
        })
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Base raster masked by the overlay
    pub fn template_image(&self) -> &GrayImage {
        &self.template_image
    }

    /// Photograph masked by the overlay
    pub fn captured_image(&self) -> &GrayImage {
        &self.captured_image
    }

    pub fn template_points(&self) -> &[Point] {
        self.result.template_points()
    }

    pub fn captured_points(&self) -> &[Point] {
        self.result.captured_points()
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn percentiles(&self) -> Percentiles {
        self.result.percentiles()
    }

    pub fn has_deform(&self) -> bool {
        classify(&self.result.percentiles())
    }

    /// Diagnostic image at working resolution
    pub fn poster(&self, highlight_p90: bool) -> RgbImage {
        let options = PosterOptions {
            highlight_p90,
            ..PosterOptions::default()
        };
        render_with(&self.result, &options)
    }

    pub fn report(&self) -> AnalysisReport {
        let percentiles = self.result.percentiles();
        let deformed = self.has_deform();
        AnalysisReport {
            correlation_id: self.correlation_id,
            template_points: self.result.template_points().len(),
            captured_points: self.result.captured_points().len(),
            rows: self.result.bands().len(),
            records: self.result.records().len(),
            percentiles,
            tail_ratio: Some(percentiles.tail_ratio()).filter(|r| r.is_finite()),
            deformed,
            message: verdict_message(deformed).to_string(),
        }
    }
}

/// Rasters are already binary; nearest-neighbour keeps them that way
fn normalize_raster(raster: &ImageData) -> GrayImage {
    let resized = resize(
        raster.image(),
        WORKING_RESOLUTION,
        WORKING_RESOLUTION,
        Interpolation::Nearest,
    );
    resized.to_luma8()
}

/// Threshold color input, area-resample, then re-binarize the blended edges
fn normalize_photo(photo: &ImageData) -> GrayImage {
    let binary = if photo.is_color() {
        DynamicImage::ImageLuma8(threshold(photo.image(), BINARY_CUTOFF))
    } else {
        photo.image().clone()
    };

    if binary.width() == WORKING_RESOLUTION && binary.height() == WORKING_RESOLUTION {
        return binary.to_luma8();
    }
    let resized = resize(&binary, WORKING_RESOLUTION, WORKING_RESOLUTION, Interpolation::Area);
    threshold(&resized, BINARY_CUTOFF)
}
