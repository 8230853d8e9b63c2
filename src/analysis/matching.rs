use super::rows::RowBuckets;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// A captured point paired with its nearest template point in the same row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord {
    pub captured: Point,
    pub template: Point,
    pub distance: f64,
}

/// Nearest template point for every captured point of one row.
///
/// Greedy and non-bijective: several captured points may pick the same
/// template point. Ties keep the template point seen first. Without template
/// points nothing is emitted.
pub fn match_row(template_row: &[Point], captured_row: &[Point]) -> Vec<DistanceRecord> {
    let mut records = Vec::with_capacity(captured_row.len());

    for captured in captured_row {
        let mut best: Option<(Point, f64)> = None;
        for template in template_row {
            let distance = captured.distance(template);
            if best.map_or(true, |(_, min)| distance < min) {
                best = Some((*template, distance));
            }
        }

        if let Some((template, distance)) = best {
            records.push(DistanceRecord {
                captured: *captured,
                template,
                distance,
            });
        }
    }

    records
}

/// Match every usable row in ascending row order
pub fn match_rows(buckets: &RowBuckets) -> Vec<DistanceRecord> {
    (1..=buckets.usable_rows())
        .flat_map(|row| match_row(buckets.template_row(row), buckets.captured_row(row)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_template_point() {
        let template = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)];
        let captured = [Point::new(12.0, 1.0), Point::new(19.0, 0.0)];

        let records = match_row(&template, &captured);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].template, Point::new(10.0, 0.0));
        assert!((records[0].distance - 5f64.sqrt()).abs() < 1e-12);
        assert_eq!(records[1].template, Point::new(20.0, 0.0));
        assert!((records[1].distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tie_keeps_first_template_point() {
        let template = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let records = match_row(&template, &[Point::new(5.0, 0.0)]);
        assert_eq!(records[0].template, Point::new(0.0, 0.0));

        let reversed = [Point::new(10.0, 0.0), Point::new(0.0, 0.0)];
        let records = match_row(&reversed, &[Point::new(5.0, 0.0)]);
        assert_eq!(records[0].template, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_matching_is_not_one_to_one() {
        let template = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let captured = [Point::new(1.0, 0.0), Point::new(-1.0, 0.0), Point::new(2.0, 0.0)];
        let records = match_row(&template, &captured);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.template == Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_row_without_template_points() {
        assert!(match_row(&[], &[Point::new(1.0, 1.0)]).is_empty());
    }
}
