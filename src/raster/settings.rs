use crate::error::InspectionError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Viewport the raster has to cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
        }
    }
}

impl WindowSettings {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Generation origin; integer division, like the canvas size derived from it
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as f64, (self.height / 2) as f64)
    }

    pub fn validate(&self) -> Result<(), InspectionError> {
        if self.width < 2 || self.height < 2 {
            return Err(InspectionError::InvalidSettings(format!(
                "window must be at least 2x2, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Parameters of one family of parallel strokes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Stroke direction in degrees, kept in `[0, 360)`
    pub angle: f64,
    /// Spacing between neighbouring strokes, pixels
    pub distance: u32,
    pub thickness: u32,
    /// Shift of every stroke along the stroke normal, pixels
    pub offset: i32,
    /// Gray level the strokes are drawn with
    #[serde(default = "default_stroke_color")]
    pub color: u8,
}

fn default_stroke_color() -> u8 {
    255
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self::new(0.0, 20, 4, 0)
    }
}

impl RasterSettings {
    pub fn new(angle: f64, distance: u32, thickness: u32, offset: i32) -> Self {
        Self {
            angle: normalize_angle(angle),
            distance,
            thickness,
            offset,
            color: default_stroke_color(),
        }
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        self
    }

    /// Settings for the overlay raster laid over this one.
    ///
    /// Spacing, thickness and color carry over; angle and offset are adjusted
    /// and the angle is renormalized.
    pub fn double(&self, add_angle: f64, add_offset: i32) -> Self {
        Self {
            angle: normalize_angle(self.angle + add_angle),
            offset: self.offset + add_offset,
            ..*self
        }
    }

    /// Re-apply angle normalization, e.g. after deserializing
    pub fn normalized(mut self) -> Self {
        self.angle = normalize_angle(self.angle);
        self
    }

    pub fn validate(&self) -> Result<(), InspectionError> {
        if self.distance == 0 {
            return Err(InspectionError::InvalidSettings(
                "raster distance must be positive".to_string(),
            ));
        }
        if self.thickness == 0 {
            return Err(InspectionError::InvalidSettings(
                "raster thickness must be positive".to_string(),
            ));
        }
        if !self.angle.is_finite() {
            return Err(InspectionError::InvalidSettings(format!(
                "raster angle must be finite, got {}",
                self.angle
            )));
        }
        Ok(())
    }

    /// Key used when persisting rasters built from these settings
    pub fn stringify(&self) -> String {
        format!(
            "a{}_d{}_t{}_o{}",
            self.angle, self.distance, self.thickness, self.offset
        )
    }
}

pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
