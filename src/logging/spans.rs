//! Structured span for one analysis run

use crate::analysis::Percentiles;
use std::time::Instant;
use tracing::{span, Level, Span};
use uuid::Uuid;

/// Span covering one inspection from normalization to verdict
pub struct InspectionSpan {
    span: Span,
    start_time: Instant,
    correlation_id: Option<Uuid>,
}

impl InspectionSpan {
    pub fn new(stage: &str, correlation_id: Option<Uuid>) -> Self {
        let span = if let Some(corr_id) = correlation_id {
            span!(
                Level::INFO,
                "inspection",
                stage = stage,
                correlation_id = %corr_id,
                rows = tracing::field::Empty,
                records = tracing::field::Empty,
                deformed = tracing::field::Empty
            )
        } else {
            span!(
                Level::INFO,
                "inspection",
                stage = stage,
                rows = tracing::field::Empty,
                records = tracing::field::Empty,
                deformed = tracing::field::Empty
            )
        };

        Self {
            span,
            start_time: Instant::now(),
            correlation_id,
        }
    }

    /// Record blob extraction counts
    pub fn record_points(&self, template_points: usize, captured_points: usize) {
        tracing::debug!(
            parent: &self.span,
            template_points,
            captured_points,
            "Blob centroids extracted"
        );
    }

    /// Record row partitioning and matching results
    pub fn record_matching(&self, rows: usize, records: usize) {
        self.span.record("rows", rows);
        self.span.record("records", records);
        tracing::debug!(parent: &self.span, rows, records, "Row matching completed");
    }

    /// Record the final verdict
    pub fn record_verdict(&self, percentiles: &Percentiles, deformed: bool) {
        let duration = self.start_time.elapsed();
        self.span.record("deformed", deformed);
        tracing::info!(
            parent: &self.span,
            p50 = format!("{:.3}px", percentiles.p50),
            p90 = format!("{:.3}px", percentiles.p90),
            p99 = format!("{:.3}px", percentiles.p99),
            tail_ratio = format!("{:.3}", percentiles.tail_ratio()),
            deformed,
            execution_time_ms = duration.as_millis(),
            "Inspection completed"
        );
    }

    pub fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspection_span_records() {
        let correlation_id = Uuid::new_v4();
        let span = InspectionSpan::new("analysis", Some(correlation_id));
        assert_eq!(span.correlation_id(), Some(correlation_id));

        let _enter = span.enter();
        span.record_points(120, 118);
        span.record_matching(12, 110);
        span.record_verdict(&Percentiles::new(1.0, 1.5, 2.0), false);
    }

    #[test]
    fn test_span_without_correlation() {
        let span = InspectionSpan::new("analysis", None);
        assert!(span.correlation_id().is_none());
        span.record_matching(2, 4);
    }
}
