use crate::data::{ImageData, SourceType};
use crate::error::InspectionError;
use crate::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};

/// Sigma OpenCV derives for a 9x9 Gaussian kernel
pub const SMOOTH_SIGMA: f32 = 1.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Keeps binary images binary
    Nearest,
    #[default]
    Linear,
    /// Downscaling; the triangle filter is the closest `image` offers to pixel-area averaging
    Area,
}

impl Interpolation {
    fn filter(self) -> FilterType {
        match self {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Linear | Interpolation::Area => FilterType::Triangle,
        }
    }
}

/// Direction used when stacking images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Stack downwards
    Vertical,
    /// Stack to the right
    Horizontal,
}

/// Binary threshold on luma: values above `cutoff` become 255, the rest 0
pub fn threshold(image: &DynamicImage, cutoff: u8) -> GrayImage {
    let mut gray = image.to_luma8();
    for pixel in gray.pixels_mut() {
        pixel[0] = if pixel[0] > cutoff { 255 } else { 0 };
    }
    gray
}

/// Drop the first `rows` rows of the image
pub fn crop_top(image: &DynamicImage, rows: u32) -> Result<DynamicImage> {
    if rows >= image.height() {
        return Err(anyhow::anyhow!(
            "Cannot crop {} rows from an image {} rows high",
            rows,
            image.height()
        ));
    }
    Ok(image.crop_imm(0, rows, image.width(), image.height() - rows))
}

pub fn resize(image: &DynamicImage, width: u32, height: u32, interpolation: Interpolation) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    image.resize_exact(width, height, interpolation.filter())
}

/// Keep `base` pixels wherever `mask` is non-zero
pub fn mask(base: &GrayImage, mask: &GrayImage) -> std::result::Result<GrayImage, InspectionError> {
    if base.dimensions() != mask.dimensions() {
        return Err(InspectionError::DimensionMismatch {
            base: base.dimensions(),
            mask: mask.dimensions(),
        });
    }

    Ok(GrayImage::from_fn(base.width(), base.height(), |x, y| {
        if mask.get_pixel(x, y)[0] > 0 {
            *base.get_pixel(x, y)
        } else {
            Luma([0])
        }
    }))
}

/// Gaussian blur with the default 9x9-equivalent sigma
pub fn smooth(image: &DynamicImage) -> DynamicImage {
    smooth_with(image, SMOOTH_SIGMA)
}

pub fn smooth_with(image: &DynamicImage, sigma: f32) -> DynamicImage {
    image.blur(sigma)
}

/// Tile `image` `amount` times along `axis`
pub fn repeat(image: &GrayImage, axis: Axis, amount: u32) -> Result<GrayImage> {
    if amount == 0 {
        return Err(anyhow::anyhow!("Repeat amount must be positive"));
    }
    let (w, h) = image.dimensions();
    let (out_w, out_h) = match axis {
        Axis::Vertical => (w, h * amount),
        Axis::Horizontal => (w * amount, h),
    };

    let mut tiled = GrayImage::new(out_w, out_h);
    for i in 0..amount {
        let (x, y) = match axis {
            Axis::Vertical => (0, i * h),
            Axis::Horizontal => (i * w, 0),
        };
        imageops::replace(&mut tiled, image, x as i64, y as i64);
    }
    Ok(tiled)
}

/// Join two images along `axis`; the other dimension has to agree
pub fn concat(first: &GrayImage, second: &GrayImage, axis: Axis) -> Result<GrayImage> {
    let (w1, h1) = first.dimensions();
    let (w2, h2) = second.dimensions();

    let (out_w, out_h, x, y) = match axis {
        Axis::Vertical if w1 == w2 => (w1, h1 + h2, 0, h1),
        Axis::Horizontal if h1 == h2 => (w1 + w2, h1, w1, 0),
        _ => {
            return Err(anyhow::anyhow!(
                "Cannot concat {}x{} and {}x{} along {:?}",
                w1, h1, w2, h2, axis
            ))
        }
    };

    let mut joined = GrayImage::new(out_w, out_h);
    imageops::replace(&mut joined, first, 0, 0);
    imageops::replace(&mut joined, second, x as i64, y as i64);
    Ok(joined)
}

/// Mask `base` with `mask`; both must be rasters or processed images
pub fn masking(base: &ImageData, mask_image: &ImageData) -> std::result::Result<ImageData, InspectionError> {
    let accepted = [SourceType::Raster, SourceType::Processed];
    base.require("masking", &accepted)?;
    mask_image.require("masking", &accepted)?;

    let masked = mask(&base.to_luma8(), &mask_image.to_luma8())?;
    Ok(ImageData::new(masked, SourceType::Processed))
}

pub fn repeat_image(image: &ImageData, axis: Axis, amount: u32) -> Result<ImageData> {
    image.require("repeat", &[SourceType::Processed])?;
    let tiled = repeat(&image.to_luma8(), axis, amount)?;
    Ok(ImageData::new(tiled, SourceType::Processed))
}

/// Stack a list of images; a single image is returned untouched
pub fn concat_all(images: &[ImageData], axis: Axis) -> Result<ImageData> {
    match images {
        [] => Err(anyhow::anyhow!("Cannot concat an empty list of images")),
        [single] => Ok(single.clone()),
        [first, rest @ ..] => {
            let mut joined = first.to_luma8();
            for next in rest {
                joined = concat(&joined, &next.to_luma8(), axis)?;
            }
            Ok(ImageData::new(joined, SourceType::Processed))
        }
    }
}

/// Blur an image of any tag; the result is tagged PROCESSED
pub fn smooth_image(image: &ImageData) -> ImageData {
    ImageData::new(smooth(image.image()), SourceType::Processed)
}
