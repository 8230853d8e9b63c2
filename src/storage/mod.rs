//! Writing rasters, camera frames and posters to disk.

use crate::data::{ImageData, SourceType};
use crate::raster::{generate, RasterSettings, WindowSettings};
use crate::Result;
use anyhow::Context;
use chrono::Local;
use image::{GrayImage, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Timestamp format used in frame file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))
}

/// Persists generated rasters as `raster_<settings>.png`
#[derive(Debug, Clone)]
pub struct RasterStore {
    directory: PathBuf,
    enabled: bool,
}

impl RasterStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            enabled: true,
        }
    }

    pub fn disabled(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            enabled: false,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, settings: &RasterSettings) -> PathBuf {
        self.directory.join(format!("raster_{}.png", settings.stringify()))
    }

    /// Write `raster`; returns `None` when persistence is disabled
    pub fn save(&self, raster: &GrayImage, settings: &RasterSettings) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }
        ensure_dir(&self.directory)?;
        let path = self.path_for(settings);
        raster
            .save(&path)
            .with_context(|| format!("Failed to save raster to {}", path.display()))?;
        debug!(path = %path.display(), "Raster saved");
        Ok(Some(path))
    }
}

/// Generate a raster and save it once, only after generation succeeded
pub fn create_raster(
    window: &WindowSettings,
    settings: &RasterSettings,
    store: Option<&RasterStore>,
) -> Result<ImageData> {
    let raster = generate(window, settings)?;
    if let Some(store) = store {
        store.save(&raster, settings)?;
    }
    Ok(ImageData::new(raster, SourceType::Raster))
}

/// Timestamped snapshots of camera frames, rasters and posters
#[derive(Debug, Clone)]
pub struct FrameStore {
    camera_dir: PathBuf,
    raster_dir: PathBuf,
    poster_dir: PathBuf,
}

impl FrameStore {
    pub fn new(camera_dir: impl Into<PathBuf>, raster_dir: impl Into<PathBuf>, poster_dir: impl Into<PathBuf>) -> Self {
        Self {
            camera_dir: camera_dir.into(),
            raster_dir: raster_dir.into(),
            poster_dir: poster_dir.into(),
        }
    }

    /// All three kinds under one root, in `camera/`, `rasters/` and `posters/`
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join("camera"), root.join("rasters"), root.join("posters"))
    }

    fn timestamped(dir: &Path, prefix: &str) -> PathBuf {
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        dir.join(format!("{}_{}.png", prefix, stamp))
    }

    pub fn save_camera_image(&self, frame: &ImageData) -> Result<PathBuf> {
        frame.require("save camera image", &[SourceType::Raw])?;
        self.write(frame, &self.camera_dir, "camera")
    }

    pub fn save_raster_image(&self, raster: &ImageData) -> Result<PathBuf> {
        raster.require("save raster image", &[SourceType::Raster])?;
        self.write(raster, &self.raster_dir, "raster")
    }

    pub fn save_poster(&self, poster: &RgbImage) -> Result<PathBuf> {
        self.write(&ImageData::new(poster.clone(), SourceType::None), &self.poster_dir, "poster")
    }

    fn write(&self, image: &ImageData, dir: &Path, prefix: &str) -> Result<PathBuf> {
        ensure_dir(dir)?;
        let path = Self::timestamped(dir, prefix);
        image
            .image()
            .save(&path)
            .with_context(|| format!("Failed to save {} image to {}", prefix, path.display()))?;
        info!(path = %path.display(), "{} image saved", prefix);
        Ok(path)
    }
}
