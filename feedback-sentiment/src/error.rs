//! Classifier error types.
//!
//! None of these escape `classify`; they end up in the `error` field of a
//! fallback result.

use thiserror::Error;

/// Errors raised inside the classification pipeline.
///
/// `Clone` so a failed one-time rule compilation can be reported by every call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// A rule pattern failed to compile
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A rule confidence or keyword weight is out of range
    #[error("invalid weight {weight} for '{item}': {reason}")]
    InvalidWeight {
        item: String,
        weight: f64,
        reason: String,
    },

    /// Raw input was not valid UTF-8
    #[error("invalid input encoding: {0}")]
    InvalidEncoding(String),

    /// A stage ran before the field it reads was populated
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Keyword arithmetic produced a non-finite value
    #[error("non-finite score (positive={positive}, negative={negative})")]
    InvalidScore { positive: f64, negative: f64 },

    /// A completed state broke the label/confidence invariant
    #[error("inconsistent state: {0}")]
    InvalidState(String),
}
