use crate::Result;
use image::{Rgb, RgbImage};
use opencv::core::{Mat, Vec3b};
use opencv::prelude::*;

/// Convert an 8-bit BGR frame to an RGB image
pub fn bgr_mat_to_rgbimage(mat: &Mat) -> Result<RgbImage> {
    let rows = mat.rows();
    let cols = mat.cols();
    if rows <= 0 || cols <= 0 {
        return Err(anyhow::anyhow!("Cannot convert an empty frame"));
    }
    if mat.channels() != 3 {
        return Err(anyhow::anyhow!("Expected a 3-channel frame, got {} channels", mat.channels()));
    }

    let mut image = RgbImage::new(cols as u32, rows as u32);
    for y in 0..rows {
        for x in 0..cols {
            let bgr = mat.at_2d::<Vec3b>(y, x)?;
            image.put_pixel(x as u32, y as u32, Rgb([bgr[2], bgr[1], bgr[0]]));
        }
    }
    Ok(image)
}
