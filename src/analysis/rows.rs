use crate::error::InspectionError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vertical interval `[lower, upper)` collecting the points of one raster row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowBand {
    /// 1-based, ascending with the template y coordinate
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
}

impl RowBand {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.lower && y < self.upper
    }
}

/// Build one band per distinct template y value.
///
/// The half height comes from the gap between the two smallest rows, which
/// assumes the uniform row spacing the raster generator produces.
pub fn row_bands(template: &[Point]) -> Result<Vec<RowBand>, InspectionError> {
    let mut ys: Vec<f64> = template.iter().map(|p| p.y).collect();
    ys.sort_by(|a, b| a.total_cmp(b));
    ys.dedup();

    if ys.len() < 2 {
        return Err(InspectionError::InsufficientRows { found: ys.len() });
    }

    let half_height = (ys[1] - ys[0]) / 2.0;
    Ok(ys
        .iter()
        .enumerate()
        .map(|(i, &y)| RowBand {
            index: i + 1,
            lower: y - half_height,
            upper: y + half_height,
        })
        .collect())
}

/// Group points by the first band containing their y; the rest are dropped
pub fn assign_rows(points: &[Point], bands: &[RowBand]) -> BTreeMap<usize, Vec<Point>> {
    let mut rows: BTreeMap<usize, Vec<Point>> = BTreeMap::new();
    for point in points {
        if let Some(band) = bands.iter().find(|band| band.contains(point.y)) {
            rows.entry(band.index).or_default().push(*point);
        }
    }
    rows
}

/// Template and captured points partitioned into the same template rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowBuckets {
    pub template: BTreeMap<usize, Vec<Point>>,
    pub captured: BTreeMap<usize, Vec<Point>>,
}

impl RowBuckets {
    pub fn build(template: &[Point], captured: &[Point], bands: &[RowBand]) -> Self {
        Self {
            template: assign_rows(template, bands),
            captured: assign_rows(captured, bands),
        }
    }

    pub fn max_template_row(&self) -> Option<usize> {
        self.template.keys().next_back().copied()
    }

    pub fn max_captured_row(&self) -> Option<usize> {
        self.captured.keys().next_back().copied()
    }

    /// Rows `1..=n` that both sides reach; extra coverage on either side is ignored
    pub fn usable_rows(&self) -> usize {
        match (self.max_template_row(), self.max_captured_row()) {
            (Some(t), Some(c)) => t.min(c),
            _ => 0,
        }
    }

    pub fn template_row(&self, row: usize) -> &[Point] {
        self.template.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn captured_row(&self, row: usize) -> &[Point] {
        self.captured.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_bands_from_two_rows() {
        let bands = row_bands(&pts(&[(30.0, 30.0), (10.0, 10.0), (30.0, 10.0)])).unwrap();
        assert_eq!(
            bands,
            vec![
                RowBand { index: 1, lower: 0.0, upper: 20.0 },
                RowBand { index: 2, lower: 20.0, upper: 40.0 },
            ]
        );
    }

    #[test]
    fn test_single_row_is_rejected() {
        let err = row_bands(&pts(&[(1.0, 5.0), (9.0, 5.0)])).unwrap_err();
        assert_eq!(err, InspectionError::InsufficientRows { found: 1 });
        assert!(row_bands(&[]).is_err());
    }

    #[test]
    fn test_band_is_half_open() {
        let band = RowBand { index: 1, lower: 0.0, upper: 20.0 };
        assert!(band.contains(0.0));
        assert!(band.contains(19.999));
        assert!(!band.contains(20.0));
        assert!(!band.contains(-0.001));
    }

    #[test]
    fn test_points_outside_bands_are_dropped() {
        let bands = row_bands(&pts(&[(0.0, 10.0), (0.0, 30.0)])).unwrap();
        let rows = assign_rows(&pts(&[(1.0, -5.0), (2.0, 12.0), (3.0, 40.0), (4.0, 39.5)]), &bands);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[&1], pts(&[(2.0, 12.0)]));
        assert_eq!(rows[&2], pts(&[(4.0, 39.5)]));
    }

    #[test]
    fn test_usable_rows() {
        let bands = row_bands(&pts(&[(0.0, 10.0), (0.0, 30.0), (0.0, 50.0)])).unwrap();
        let buckets = RowBuckets::build(
            &pts(&[(0.0, 10.0), (0.0, 30.0), (0.0, 50.0)]),
            &pts(&[(0.0, 11.0), (0.0, 29.0)]),
            &bands,
        );
        assert_eq!(buckets.max_template_row(), Some(3));
        assert_eq!(buckets.max_captured_row(), Some(2));
        assert_eq!(buckets.usable_rows(), 2);
        assert!(buckets.captured_row(3).is_empty());

        let empty = RowBuckets::build(&pts(&[(0.0, 10.0)]), &[], &bands);
        assert_eq!(empty.usable_rows(), 0);
    }
}
