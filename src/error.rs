use crate::data::SourceType;
use thiserror::Error;

/// Precondition violations raised by the inspection core.
///
/// Everything here is synchronous and local: the core does no I/O, so there is
/// nothing to retry. Callers either fix their inputs or surface the error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InspectionError {
    #[error("{operation} expects an image tagged {expected:?}, got {actual}")]
    InvalidSource {
        operation: &'static str,
        expected: Vec<SourceType>,
        actual: SourceType,
    },

    #[error("percentiles are undefined for an empty distance list")]
    EmptyDistances,

    #[error("row partitioning needs at least two distinct template rows, found {found}")]
    InsufficientRows { found: usize },

    #[error("image size mismatch: base is {base:?}, mask is {mask:?}")]
    DimensionMismatch { base: (u32, u32), mask: (u32, u32) },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("unknown image source tag '{0}'")]
    UnknownSourceTag(String),
}
