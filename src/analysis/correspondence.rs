use super::matching::{match_rows, DistanceRecord};
use super::percentiles::Percentiles;
use super::rows::{row_bands, RowBand, RowBuckets};
use crate::error::InspectionError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything one correspondence run produced; immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    template_points: Vec<Point>,
    captured_points: Vec<Point>,
    bands: Vec<RowBand>,
    rows: RowBuckets,
    records: Vec<DistanceRecord>,
    percentiles: Percentiles,
}

impl AnalysisResult {
    pub fn template_points(&self) -> &[Point] {
        &self.template_points
    }

    pub fn captured_points(&self) -> &[Point] {
        &self.captured_points
    }

    pub fn bands(&self) -> &[RowBand] {
        &self.bands
    }

    pub fn rows(&self) -> &RowBuckets {
        &self.rows
    }

    pub fn records(&self) -> &[DistanceRecord] {
        &self.records
    }

    pub fn percentiles(&self) -> Percentiles {
        self.percentiles
    }

    /// Records at or above the 90th percentile distance
    pub fn worst_records(&self) -> impl Iterator<Item = &DistanceRecord> {
        let cutoff = self.percentiles.p90;
        self.records.iter().filter(move |r| r.distance >= cutoff)
    }

    pub fn is_deformed(&self) -> bool {
        super::classify(&self.percentiles)
    }
}

/// Match captured blob centroids against template centroids row by row.
///
/// Rows come from the template's distinct y values. Points outside every
/// row, and captured points whose row has no template points, are skipped.
pub fn analyze(template_points: &[Point], captured_points: &[Point]) -> Result<AnalysisResult, InspectionError> {
    let bands = row_bands(template_points)?;
    let rows = RowBuckets::build(template_points, captured_points, &bands);
    let records = match_rows(&rows);

    let distances: Vec<f64> = records.iter().map(|r| r.distance).collect();
    let percentiles = Percentiles::from_distances(&distances)?;

    debug!(
        template_points = template_points.len(),
        captured_points = captured_points.len(),
        rows = bands.len(),
        usable_rows = rows.usable_rows(),
        records = records.len(),
        p50 = percentiles.p50,
        p90 = percentiles.p90,
        p99 = percentiles.p99,
        "Correspondence analysis completed"
    );

    Ok(AnalysisResult {
        template_points: template_points.to_vec(),
        captured_points: captured_points.to_vec(),
        bands,
        rows,
        records,
        percentiles,
    })
}
