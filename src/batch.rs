//! Filling many series at once.
//!
//! Every series in a batch is filled independently, with the same [`ImputeOptions`].
//! With the `parallel` feature (on by default) the series are spread across a rayon pool.
//! Results always come back in input order.
//!
//! - [`fill_batch`] returns one result per series
//! - [`fill_batch_strict`] stops at the first series that fails, naming its position
//! - [`BatchReport`] collects successes and failures side by side, for reporting
//!
//! ```rust
//! # use gapfill::{Series, ImputeOptions, batch::fill_batch_strict};
//! let batch = vec![
//!     Series::new(vec![Some(1.0), None, Some(2.0)]),
//!     Series::new(vec![None, Some(5.0), None, Some(5.0)]),
//! ];
//!
//! let response = fill_batch_strict(&batch, &ImputeOptions::default()).unwrap();
//! assert_eq!(response.filled[1], vec![5.0, 5.0, 5.0, 5.0]);
//! ```
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    impute::{ImputeOptions, Imputation, Imputer},
    series::Series,
    value::Value,
};

/// Fills every series in `batch`, returning one result per series in input order.
///
/// A failing series does not affect the others.
pub fn fill_batch<T: Value>(
    batch: &[Series<T>],
    options: &ImputeOptions<T>,
) -> Vec<Result<Imputation<T>>> {
    let imputer = Imputer::new(*options);
    tracing::debug!(series = batch.len(), "filling batch");

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        batch.par_iter().map(|series| imputer.fill(series)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        batch.iter().map(|series| imputer.fill(series)).collect()
    }
}

/// Fills every series in `batch`, failing if any one of them fails.
///
/// # Errors
/// Returns [`Error::BatchItem`] wrapping the failure of the first failing series, by input position.
pub fn fill_batch_strict<T: Value>(
    batch: &[Series<T>],
    options: &ImputeOptions<T>,
) -> Result<BatchResponse<T>> {
    BatchResponse::from_results(fill_batch(batch, options))
}

/// Completed series for a whole batch, in input order.
///
/// Serializes as `{ "filled": [[...], ...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse<T> {
    /// The completed series.
    pub filled: Vec<Vec<T>>,
}

impl<T: Value> BatchResponse<T> {
    /// Builds a response from per-series results, as returned by [`fill_batch`].
    ///
    /// # Errors
    /// Returns [`Error::BatchItem`] wrapping the first failed result, by input position.
    pub fn from_results(results: Vec<Result<Imputation<T>>>) -> Result<Self> {
        let filled = results
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result
                    .map(Imputation::into_values)
                    .map_err(|e| Error::BatchItem {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { filled })
    }
}

/// A series that could not be filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Position of the series in the batch.
    pub index: usize,

    /// Why it failed.
    pub message: String,
}

/// Outcome of a whole batch where individual series may fail.
///
/// Serializes as `{ "filled": [[...], null, ...], "errors": [{ "index": 1, "message": "..." }] }`,
/// where failed series are `null` in `filled`. `errors` is omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport<T> {
    /// The completed series, or `None` where a series failed.
    pub filled: Vec<Option<Vec<T>>>,

    /// Every failure, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BatchFailure>,
}

impl<T: Value> BatchReport<T> {
    /// Fills every series in `batch`, recording failures instead of stopping at them.
    #[must_use]
    pub fn fill(batch: &[Series<T>], options: &ImputeOptions<T>) -> Self {
        Self::from_results(fill_batch(batch, options))
    }

    /// Builds a report from per-series results, as returned by [`fill_batch`].
    #[must_use]
    pub fn from_results(results: Vec<Result<Imputation<T>>>) -> Self {
        let mut filled = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(imputation) => filled.push(Some(imputation.into_values())),
                Err(e) => {
                    tracing::warn!(index, error = %e, "series in batch failed");
                    errors.push(BatchFailure {
                        index,
                        message: e.to_string(),
                    });
                    filled.push(None);
                }
            }
        }

        Self { filled, errors }
    }

    /// True if every series was filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
