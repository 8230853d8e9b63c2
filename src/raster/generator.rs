use super::{RasterSettings, WindowSettings};
use crate::error::InspectionError;
use crate::geometry::{Point, Segment};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;
use tracing::debug;

/// Integer pixel shift of `distance` along the normal of a stroke at `angle` degrees
fn line_shift(distance: f64, angle: f64) -> (f64, f64) {
    let rad = (angle + 90.0).to_radians();
    ((distance * rad.cos()).trunc(), (distance * rad.sin()).trunc())
}

/// Stroke steps needed on each side of the center to leave the viewport.
/// Never fewer than one, so a huge spacing still yields a stroke.
fn lines_amount(reach: f64, pitch: f64) -> i32 {
    let amount = 2 * (reach / pitch).floor() as i32;
    amount.max(1)
}

/// Plans and draws a family of parallel strokes covering a viewport.
///
/// Strokes run along `settings.angle`; consecutive strokes are `distance`
/// pixels apart along the normal. All strokes are `2 * reach` long, where
/// `reach` is the distance from the image origin to the viewport center, so
/// they span the viewport at any rotation.
#[derive(Debug, Clone)]
pub struct RasterGenerator {
    settings: RasterSettings,
    canvas: (u32, u32),
    center: Point,
    reach: f64,
    amount: i32,
    step: (f64, f64),
    offset: (f64, f64),
}

impl RasterGenerator {
    pub fn new(window: &WindowSettings, settings: &RasterSettings) -> Result<Self, InspectionError> {
        window.validate()?;
        settings.validate()?;

        let center = window.center();
        let reach = center.distance(&Point::origin()).ceil();
        let amount = lines_amount(reach, (settings.distance + settings.thickness) as f64);
        let step = line_shift(settings.distance as f64, settings.angle);
        let offset = line_shift(settings.offset as f64, settings.angle);

        if step == (0.0, 0.0) {
            return Err(InspectionError::InvalidSettings(format!(
                "distance {} collapses to a zero pixel step at {} degrees",
                settings.distance, settings.angle
            )));
        }

        Ok(Self {
            settings: *settings,
            canvas: (center.x as u32 * 2, center.y as u32 * 2),
            center,
            reach,
            amount,
            step,
            offset,
        })
    }

    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    pub fn reach(&self) -> f64 {
        self.reach
    }

    /// Steps on each side of the center; `2 * amount` strokes are drawn
    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn stroke_count(&self) -> usize {
        2 * self.amount as usize
    }

    /// Pixel step between consecutive strokes
    pub fn step(&self) -> (f64, f64) {
        self.step
    }

    pub fn offset_vector(&self) -> (f64, f64) {
        self.offset
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    /// Stroke segments in drawing order, offset already applied.
    ///
    /// Stroke `i` (from `amount` down to `-amount + 1`) is centered on
    /// `center - i * step + offset`.
    pub fn strokes(&self) -> Vec<Segment> {
        let (sx, sy) = self.step;
        let far = self
            .center
            .translated(-(self.amount as f64) * sx, -(self.amount as f64) * sy);
        let axis = Segment::new(self.center, far);
        let Some(mut stroke) = axis.perpendicular(2.0 * self.reach) else {
            // Unreachable: the constructor rejects a zero step
            return Vec::new();
        };

        let mut strokes = Vec::with_capacity(self.stroke_count());
        for _ in (-self.amount + 1..=self.amount).rev() {
            strokes.push(stroke.shifted(self.offset.0, self.offset.1));
            stroke.shift(sx, sy);
        }
        strokes
    }

    /// Draw every stroke onto a fresh single-channel canvas
    pub fn render(&self) -> GrayImage {
        let (width, height) = self.canvas;
        let mut raster = GrayImage::new(width, height);
        let color = Luma([self.settings.color]);

        for stroke in self.strokes() {
            draw_stroke(&mut raster, &stroke, self.settings.thickness, color);
        }

        debug!(
            angle = self.settings.angle,
            distance = self.settings.distance,
            thickness = self.settings.thickness,
            offset = self.settings.offset,
            strokes = self.stroke_count(),
            width,
            height,
            "Raster generated"
        );
        raster
    }
}

/// Draw `segment` as a band `thickness` pixels wide.
///
/// Polygon fill includes both edges, so the edges sit `(thickness - 1) / 2`
/// from the center line. With an even thickness the half-pixel edges round
/// away from zero, so the band sits one row off center.
pub fn draw_stroke(canvas: &mut GrayImage, segment: &Segment, thickness: u32, color: Luma<u8>) {
    let length = segment.length();
    if length == 0.0 {
        return;
    }

    if thickness <= 1 {
        draw_line_segment_mut(
            canvas,
            (segment.pta.x as f32, segment.pta.y as f32),
            (segment.ptb.x as f32, segment.ptb.y as f32),
            color,
        );
        return;
    }

    let half = (thickness as f64 - 1.0) / 2.0;
    let nx = -(segment.ptb.y - segment.pta.y) / length * half;
    let ny = (segment.ptb.x - segment.pta.x) / length * half;

    let corners = [
        segment.pta.translated(nx, ny),
        segment.ptb.translated(nx, ny),
        segment.ptb.translated(-nx, -ny),
        segment.pta.translated(-nx, -ny),
    ];
    let polygon: Vec<PixelPoint<i32>> = corners
        .iter()
        .map(|corner| {
            let (x, y) = corner.to_pixel();
            PixelPoint::new(x, y)
        })
        .collect();

    draw_polygon_mut(canvas, &polygon, color);
}

/// Render the raster for `settings` over `window`
pub fn generate(window: &WindowSettings, settings: &RasterSettings) -> Result<GrayImage, InspectionError> {
    Ok(RasterGenerator::new(window, settings)?.render())
}

/// Stroke plan for `settings` over `window`, without drawing
pub fn strokes(window: &WindowSettings, settings: &RasterSettings) -> Result<Vec<Segment>, InspectionError> {
    Ok(RasterGenerator::new(window, settings)?.strokes())
}
