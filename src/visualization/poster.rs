use crate::analysis::{AnalysisResult, WORKING_RESOLUTION};
use crate::data::{ImageData, SourceType};
use crate::geometry::Point;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

pub const TEMPLATE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const CAPTURED_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

#[derive(Debug, Clone, PartialEq)]
pub struct PosterOptions {
    pub width: u32,
    pub height: u32,
    pub marker_radius: i32,
    /// Connect every pair at or above the 90th percentile distance
    pub highlight_p90: bool,
    pub template_color: Rgb<u8>,
    pub captured_color: Rgb<u8>,
    pub highlight_color: Rgb<u8>,
}

impl Default for PosterOptions {
    fn default() -> Self {
        Self {
            width: WORKING_RESOLUTION,
            height: WORKING_RESOLUTION,
            marker_radius: 1,
            highlight_p90: true,
            template_color: TEMPLATE_COLOR,
            captured_color: CAPTURED_COLOR,
            highlight_color: HIGHLIGHT_COLOR,
        }
    }
}

/// Poster on a black working-resolution canvas
pub fn render(result: &AnalysisResult, highlight_p90: bool) -> RgbImage {
    let options = PosterOptions {
        highlight_p90,
        ..PosterOptions::default()
    };
    render_with(result, &options)
}

/// Template markers, captured markers, then the worst pairs on top
pub fn render_with(result: &AnalysisResult, options: &PosterOptions) -> RgbImage {
    let mut poster = RgbImage::new(options.width, options.height);

    draw_markers(&mut poster, result.template_points(), options.marker_radius, options.template_color);
    draw_markers(&mut poster, result.captured_points(), options.marker_radius, options.captured_color);

    if options.highlight_p90 {
        for record in result.worst_records() {
            draw_line_segment_mut(
                &mut poster,
                (record.captured.x as f32, record.captured.y as f32),
                (record.template.x as f32, record.template.y as f32),
                options.highlight_color,
            );
        }
    }

    tracing::debug!(
        width = options.width,
        height = options.height,
        highlighted = options.highlight_p90,
        "Poster rendered"
    );
    poster
}

pub fn draw_markers(poster: &mut RgbImage, points: &[Point], radius: i32, color: Rgb<u8>) {
    for point in points {
        draw_filled_circle_mut(poster, point.to_pixel(), radius, color);
    }
}

/// Mark `points` on a color copy of `image`
pub fn poster_points(image: &ImageData, points: &[Point], radius: i32, color: Rgb<u8>) -> ImageData {
    let mut poster = image.image().to_rgb8();
    draw_markers(&mut poster, points, radius, color);
    ImageData::new(poster, SourceType::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use image::GrayImage;

    fn result() -> AnalysisResult {
        let template = [(10.0, 10.0), (30.0, 10.0), (10.0, 30.0), (30.0, 30.0)];
        let captured = [(11.0, 11.0), (31.0, 9.0), (9.0, 31.0), (33.0, 33.0)];
        let t: Vec<Point> = template.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let c: Vec<Point> = captured.iter().map(|&(x, y)| Point::new(x, y)).collect();
        analyze(&t, &c).unwrap()
    }

    #[test]
    fn test_markers_and_highlight() {
        let options = PosterOptions {
            width: 50,
            height: 50,
            ..PosterOptions::default()
        };
        let poster = render_with(&result(), &options);

        assert_eq!(*poster.get_pixel(10, 10), TEMPLATE_COLOR);
        assert_eq!(*poster.get_pixel(11, 11), CAPTURED_COLOR);
        // Only the (33, 33) -> (30, 30) pair reaches p90
        assert_eq!(*poster.get_pixel(32, 32), HIGHLIGHT_COLOR);
        assert_eq!(*poster.get_pixel(45, 45), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_no_highlight() {
        let options = PosterOptions {
            width: 50,
            height: 50,
            highlight_p90: false,
            ..PosterOptions::default()
        };
        let poster = render_with(&result(), &options);
        assert!(poster.pixels().all(|p| *p != HIGHLIGHT_COLOR));
    }

    #[test]
    fn test_default_canvas() {
        assert_eq!(render(&result(), true).dimensions(), (WORKING_RESOLUTION, WORKING_RESOLUTION));
    }

    #[test]
    fn test_poster_points_on_gray_image() {
        let gray = ImageData::new(GrayImage::new(20, 20), SourceType::Processed);
        let marked = poster_points(&gray, &[Point::new(5.0, 5.0)], 2, CAPTURED_COLOR);
        assert_eq!(marked.source(), SourceType::None);
        assert!(marked.is_color());
        assert_eq!(*marked.image().to_rgb8().get_pixel(5, 7), CAPTURED_COLOR);
    }
}
