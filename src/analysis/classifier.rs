use super::percentiles::Percentiles;

/// Median offset, in working-resolution pixels, above which the whole raster
/// is considered shifted or blurred
pub const MAX_MEDIAN_OFFSET_PX: f64 = 4.0;

/// p99 / p50 ratio above which a few outliers indicate a local bulge or concavity
pub const MAX_TAIL_RATIO: f64 = 2.1;

/// Deformation verdict over the distance percentiles
pub fn classify(percentiles: &Percentiles) -> bool {
    percentiles.p50 > MAX_MEDIAN_OFFSET_PX || percentiles.tail_ratio() > MAX_TAIL_RATIO
}

pub fn verdict_message(deformed: bool) -> &'static str {
    if deformed {
        "Deformation detected"
    } else {
        "No defects"
    }
}
