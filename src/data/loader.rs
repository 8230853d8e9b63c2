use crate::data::{ImageData, SourceType};
use crate::Result;
use std::path::Path;

/// Load an image and tag it according to `tag` (`raw`, `raster`, `process`)
pub fn load_image_by_tag<P: AsRef<Path>>(path: P, tag: &str) -> Result<ImageData> {
    match tag.parse::<SourceType>()? {
        SourceType::Raw => load_raw_image(path),
        SourceType::Raster => load_raster_image(path),
        SourceType::Processed => load_processed_image(path),
        SourceType::None => Err(anyhow::anyhow!("Images cannot be loaded with the 'none' tag")),
    }
}

/// Camera photograph, kept in full color
pub fn load_raw_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let img = open_checked(path.as_ref())?;
    Ok(ImageData::new(img.to_rgb8(), SourceType::Raw))
}

pub fn load_raster_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let img = open_checked(path.as_ref())?;
    Ok(ImageData::new(img.to_luma8(), SourceType::Raster))
}

pub fn load_processed_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let img = open_checked(path.as_ref())?;
    Ok(ImageData::new(img.to_luma8(), SourceType::Processed))
}

fn open_checked(path: &Path) -> Result<image::DynamicImage> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Image file does not exist: {}",
            path.display()
        ));
    }
    let img = image::open(path)?;
    validate_image_size(img.width(), img.height(), 2)?;
    Ok(img)
}

pub fn validate_image_size(width: u32, height: u32, min_size: u32) -> Result<()> {
    if width < min_size || height < min_size {
        return Err(anyhow::anyhow!("Image too small: {}x{}, minimum: {}x{}",
                          width, height, min_size, min_size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tempfile::TempDir;

    #[test]
    fn test_load_by_tag_assigns_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stripes.png");
        GrayImage::from_fn(8, 8, |_, y| Luma([if y % 2 == 0 { 255 } else { 0 }]))
            .save(&path)
            .unwrap();

        let raster = load_image_by_tag(&path, "raster").unwrap();
        assert_eq!(raster.source(), SourceType::Raster);
        assert!(!raster.is_color());

        let raw = load_image_by_tag(&path, "Raw").unwrap();
        assert_eq!(raw.source(), SourceType::Raw);
        assert!(raw.is_color());

        let processed = load_image_by_tag(&path, "process").unwrap();
        assert_eq!(processed.source(), SourceType::Processed);

        assert!(load_image_by_tag(&path, "bogus").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_raster_image(dir.path().join("nope.png")).is_err());
    }
}
