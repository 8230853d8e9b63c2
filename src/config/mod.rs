use crate::logging::LoggingConfig;
use crate::preprocessing::PreprocessingStage;
use crate::raster::{RasterSettings, WindowSettings};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest gap between stroke spacing and stroke thickness that still
/// leaves a visible background band between strokes
pub const MIN_DISTANCE_THICKNESS_GAP: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowSettings,
    pub raster: RasterSettings,
    pub overlay: OverlayConfig,
    pub processing: ProcessingConfig,
    pub analysis: AnalysisConfig,
    pub storage: StorageConfig,
    pub camera: CameraConfig,
    pub logging: LoggingConfig,
}

/// How the overlay raster is derived from the base raster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub add_angle: f64,
    pub add_offset: i32,
    /// Overrides the base raster's thickness when set
    pub thickness: Option<u32>,
    /// Overrides the base raster's distance when set
    pub distance: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Binary threshold applied to photographs
    pub threshold: u8,
    /// Rows cut from the top of every photograph
    pub top_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub highlight_p90: bool,
    pub marker_radius: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub save_rasters: bool,
    pub raster_dir: PathBuf,
    pub camera_dir: PathBuf,
    pub poster_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub device: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            add_angle: 45.0,
            add_offset: 0,
            thickness: None,
            distance: None,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            threshold: 100,
            top_offset: 16,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            highlight_p90: true,
            marker_radius: 1,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_rasters: true,
            raster_dir: PathBuf::from("data/rasters"),
            camera_dir: PathBuf::from("data/camera"),
            poster_dir: PathBuf::from("data/posters"),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            width: 1280,
            height: 720,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        if content.trim_start().starts_with('{') {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ConfigFormat) -> Result<()> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Settings of the base raster
    pub fn base_raster(&self) -> RasterSettings {
        self.raster.normalized()
    }

    /// Base raster rotated and shifted by the overlay section
    pub fn overlay_raster(&self) -> RasterSettings {
        let mut over = self.raster.double(self.overlay.add_angle, self.overlay.add_offset);
        if let Some(thickness) = self.overlay.thickness {
            over = over.with_thickness(thickness);
        }
        if let Some(distance) = self.overlay.distance {
            over = over.with_distance(distance);
        }
        over
    }

    pub fn preprocessing(&self) -> PreprocessingStage {
        PreprocessingStage::standard(self.processing.threshold, self.processing.top_offset, &self.window)
    }

    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.window.validate() {
            errors.push(format!("window: {}", e));
        }

        for (name, settings) in [("raster", self.base_raster()), ("overlay", self.overlay_raster())] {
            if let Err(e) = settings.validate() {
                errors.push(format!("{}: {}", name, e));
            } else if settings.distance < settings.thickness + MIN_DISTANCE_THICKNESS_GAP {
                errors.push(format!(
                    "{}: distance {} must exceed thickness {} by at least {}",
                    name, settings.distance, settings.thickness, MIN_DISTANCE_THICKNESS_GAP
                ));
            }
        }

        if !self.overlay.add_angle.is_finite() {
            errors.push("overlay: add_angle must be finite".to_string());
        }

        if self.analysis.marker_radius < 0 {
            errors.push("analysis: marker_radius must be non-negative".to_string());
        }

        if self.camera.width == 0 || self.camera.height == 0 {
            errors.push("camera: frame size must be positive".to_string());
        }

        if let Err(e) = self.logging.validate() {
            errors.push(format!("logging: {}", e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.json` files are JSON, everything else TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Load and validate `config_path`, falling back to defaults on any problem.
///
/// Runs before logging is set up, so problems go to stderr.
pub fn load_config_or_default(config_path: Option<&Path>) -> Config {
    match config_path {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => {
                if let Err(errors) = config.validate() {
                    eprintln!("Configuration validation errors:");
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    eprintln!("Using default configuration instead.");
                    Config::default()
                } else {
                    config
                }
            }
            Err(e) => {
                eprintln!("Failed to load config from '{}': {:#}", path.display(), e);
                eprintln!("Using default configuration.");
                Config::default()
            }
        },
        None => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.raster.distance, 20);
        assert_eq!(config.raster.thickness, 4);
        assert_eq!(config.overlay_raster().angle, 45.0);
    }

    #[test]
    fn test_overlay_overrides() {
        let mut config = Config::default();
        config.raster = RasterSettings::new(350.0, 20, 4, 0);
        config.overlay = OverlayConfig {
            add_angle: 30.0,
            add_offset: 5,
            thickness: Some(6),
            distance: Some(30),
        };
        let over = config.overlay_raster();
        assert_eq!(over.angle, 20.0);
        assert_eq!(over.offset, 5);
        assert_eq!(over.thickness, 6);
        assert_eq!(over.distance, 30);
    }

    #[test]
    fn test_validation_collects_errors() {
        let mut config = Config::default();
        config.raster = RasterSettings::new(0.0, 6, 4, 0);
        config.camera.width = 0;
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("raster:")));
        assert!(errors.iter().any(|e| e.starts_with("camera:")));
    }

    #[test]
    fn test_toml_and_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();

        let toml_path = dir.path().join("moire.toml");
        config.save_to_file(&toml_path, ConfigFormat::from_path(&toml_path)).unwrap();
        assert_eq!(Config::load_from_file(&toml_path).unwrap(), config);

        let json_path = dir.path().join("moire.json");
        config.save_to_file(&json_path, ConfigFormat::from_path(&json_path)).unwrap();
        assert!(fs::read_to_string(&json_path).unwrap().starts_with('{'));
        assert_eq!(Config::load_from_file(&json_path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[processing]\nthreshold = 90\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.processing.threshold, 90);
        assert_eq!(config.processing.top_offset, 16);
        assert_eq!(config.window, WindowSettings::default());
    }

    #[test]
    fn test_fallback_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[raster]\ndistance = 0\n").unwrap();
        assert_eq!(load_config_or_default(Some(path.as_path())), Config::default());
        assert_eq!(load_config_or_default(Some(Path::new("/nope/missing.toml"))), Config::default());
    }
}
