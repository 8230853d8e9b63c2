use crate::geometry::Point;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashMap;

/// Points describing the blobs of a binary image
#[derive(Debug, Clone, Default)]
pub struct BlobPoints {
    /// Outer border pixels of every blob
    pub outlines: Vec<Point>,
    /// One centroid per blob, rounded to the nearest pixel, in labelling order
    pub centers: Vec<Point>,
}

/// Every non-zero pixel becomes 255; labelling groups equal values only
fn binarize(image: &GrayImage) -> GrayImage {
    let mut binary = image.clone();
    for pixel in binary.pixels_mut() {
        if pixel[0] > 0 {
            pixel[0] = 255;
        }
    }
    binary
}

/// 8-connected blob analysis of a binary image.
///
/// Centroids are ordered by the raster-scan position of each blob's first
/// pixel, so repeated calls on the same image give the same list.
pub fn extract_centroids(image: &GrayImage) -> BlobPoints {
    let binary = binarize(image);
    let labels = connected_components(&binary, Connectivity::Eight, Luma([0u8]));

    // Blob slots in order of first appearance, independent of label numbering
    let mut slots: HashMap<u32, usize> = HashMap::new();
    let mut sums: Vec<(f64, f64, u64)> = Vec::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0];
        if label == 0 {
            continue;
        }
        let slot = *slots.entry(label).or_insert_with(|| {
            sums.push((0.0, 0.0, 0));
            sums.len() - 1
        });
        let entry = &mut sums[slot];
        entry.0 += x as f64;
        entry.1 += y as f64;
        entry.2 += 1;
    }

    let centers = sums
        .into_iter()
        .map(|(sx, sy, count)| {
            let n = count as f64;
            Point::new((sx / n).round(), (sy / n).round())
        })
        .collect();

    let outlines = find_contours::<u32>(&binary)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .flat_map(|contour| contour.points)
        .map(|p| Point::new(p.x as f64, p.y as f64))
        .collect();

    BlobPoints { outlines, centers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn test_centroids_of_squares() {
        let mut img = GrayImage::new(40, 20);
        draw_filled_rect_mut(&mut img, Rect::at(2, 2).of_size(5, 5), Luma([255]));
        draw_filled_rect_mut(&mut img, Rect::at(20, 10).of_size(3, 3), Luma([90]));

        let blobs = extract_centroids(&img);
        assert_eq!(blobs.centers, vec![Point::new(4.0, 4.0), Point::new(21.0, 11.0)]);
        assert!(!blobs.outlines.is_empty());
        assert!(blobs
            .outlines
            .iter()
            .all(|p| (2.0..=22.0).contains(&p.x) && (2.0..=12.0).contains(&p.y)));
    }

    #[test]
    fn test_gray_levels_form_one_blob() {
        let mut img = GrayImage::new(10, 10);
        img.put_pixel(4, 4, Luma([100]));
        img.put_pixel(5, 4, Luma([200]));
        img.put_pixel(6, 5, Luma([255]));
        assert_eq!(extract_centroids(&img).centers.len(), 1);
    }

    #[test]
    fn test_empty_image() {
        let blobs = extract_centroids(&GrayImage::new(8, 8));
        assert!(blobs.centers.is_empty());
        assert!(blobs.outlines.is_empty());
    }
}
