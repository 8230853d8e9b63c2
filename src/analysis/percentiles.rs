use crate::error::InspectionError;
use serde::{Deserialize, Serialize};

/// The (50th, 90th, 99th) percentile summary of matched-pair distances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
}

impl Percentiles {
    pub fn new(p50: f64, p90: f64, p99: f64) -> Self {
        Self { p50, p90, p99 }
    }

    /// Linear-interpolation percentiles; an empty list has none
    pub fn from_distances(distances: &[f64]) -> Result<Self, InspectionError> {
        if distances.is_empty() {
            return Err(InspectionError::EmptyDistances);
        }

        let mut sorted = distances.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Ok(Self {
            p50: percentile_sorted(&sorted, 50.0),
            p90: percentile_sorted(&sorted, 90.0),
            p99: percentile_sorted(&sorted, 99.0),
        })
    }

    /// Ratio of the tail to the median
    pub fn tail_ratio(&self) -> f64 {
        self.p99 / self.p50
    }
}

/// Percentile `q` in `[0, 100]` of an ascending, non-empty slice.
///
/// Interpolates between the two closest ranks at `q / 100 * (n - 1)`.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = (q / 100.0).clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}
