//! Error types for gap filling
//!
//! This module defines the failures that can surface from imputation and from
//! the curve primitives underneath it, along with a convenient `Result` alias.

/// Errors that can occur while filling gaps in a series.
///
/// Only [`Error::InsufficientData`] and the input validation errors are expected
/// to reach callers of [`crate::Imputer::fill`]. Numerical trouble inside the
/// spline fit is absorbed by the linear fallback and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The series has no samples at all.
    #[error("Cannot fill an empty series")]
    EmptySeries,

    /// Not enough known samples to fit a curve.
    #[error("Insufficient known data points for interpolation: found {known}, need at least {required}")]
    InsufficientData {
        /// Number of known (non-gap) samples
        known: usize,
        /// Minimum number of known samples required
        required: usize,
    },

    /// A known sample was NaN or infinite.
    ///
    /// Gaps must be marked explicitly. Use [`crate::Series::from_nan_gaps`] if
    /// your data uses NaN as the gap marker.
    #[error("Known sample at index {index} is not finite; mark gaps explicitly instead")]
    NonFiniteSample {
        /// Position of the offending sample
        index: usize,
    },

    /// The smoothness parameter was negative or not finite.
    #[error("Smoothness must be finite and non-negative, got {0}")]
    InvalidSmoothness(String),

    /// The x-values handed to a curve were not strictly increasing.
    #[error("x-values must be strictly increasing (violated at position {0})")]
    UnsortedInput(usize),

    /// The output of an imputation no longer matches a known input value.
    #[error("Known value at index {index} was modified during imputation")]
    KnownValueModified {
        /// Position of the overwritten sample
        index: usize,
    },

    /// A series in a batch failed to impute.
    #[error("Series {index} in batch failed: {source}")]
    BatchItem {
        /// Position of the series in the batch
        index: usize,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A numeric value could not be cast to the target type. This is usually a custom type much smaller than f64/f32
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// Failed to solve the banded system during a spline fit.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),
}

/// Result type for gap filling
pub type Result<T> = std::result::Result<T, Error>;
