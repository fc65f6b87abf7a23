//! Sequences of samples with explicit gaps.
//!
//! A [`Series`] is an ordered list of samples where each entry is either a known
//! value (`Some(v)`) or a gap (`None`). The position of a sample is its x-coordinate,
//! so index `i` is fitted and evaluated at `x = i`.
//!
//! Gaps are never encoded as numbers. `0.0` is a perfectly good sample, and so is
//! any other finite value. If your data uses NaN as the gap marker, convert it
//! explicitly with [`Series::from_nan_gaps`].
//!
//! When serialized, a series is a plain array where gaps become `null`:
//! ```rust
//! # use gapfill::Series;
//! let series: Series<f64> = serde_json::from_str("[1.0, null, 3.0]").unwrap();
//! assert_eq!(series.gap_count(), 1);
//! assert_eq!(serde_json::to_string(&series).unwrap(), "[1.0,null,3.0]");
//! ```
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    value::{CoordExt, Value},
};

/// Minimum number of known samples needed to fit a curve through a series.
pub const MIN_KNOWN_SAMPLES: usize = 2;

/// An ordered sequence of samples, some of which may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series<T> {
    samples: Vec<Option<T>>,
}

impl<T: Value> Series<T> {
    /// Creates a series from samples, where `None` marks a gap.
    #[must_use]
    pub fn new(samples: Vec<Option<T>>) -> Self {
        Self { samples }
    }

    /// Creates a series with no gaps.
    pub fn complete(values: impl IntoIterator<Item = T>) -> Self {
        values.into_iter().map(Some).collect()
    }

    /// Creates a series from raw values, treating every NaN as a gap.
    ///
    /// ```rust
    /// # use gapfill::Series;
    /// let series = Series::from_nan_gaps([1.0, f64::NAN, 3.0]);
    /// assert_eq!(series.gaps(), vec![1]);
    /// ```
    pub fn from_nan_gaps(values: impl IntoIterator<Item = T>) -> Self {
        values
            .into_iter()
            .map(|v| if v.is_nan() { None } else { Some(v) })
            .collect()
    }

    /// Returns the raw samples.
    #[must_use]
    pub fn samples(&self) -> &[Option<T>] {
        &self.samples
    }

    /// Returns the sample at `index`; `None` if out of bounds, `Some(None)` for a gap.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Option<T>> {
        self.samples.get(index).copied()
    }

    /// Number of samples, including gaps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the series has no samples at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of known samples.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    /// Number of gaps.
    #[must_use]
    pub fn gap_count(&self) -> usize {
        self.len() - self.known_count()
    }

    /// Returns true if the series has no gaps.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.samples.iter().all(Option::is_some)
    }

    /// Positions of every gap, in ascending order.
    #[must_use]
    pub fn gaps(&self) -> Vec<usize> {
        self.samples
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_none().then_some(i))
            .collect()
    }

    /// First known position whose value in `values` is not bit-for-bit identical.
    ///
    /// A position past the end of `values` counts as changed.
    /// ```rust
    /// # use gapfill::Series;
    /// let series = Series::new(vec![Some(1.0), None, Some(0.0)]);
    /// assert_eq!(series.first_mismatch(&[1.0, 5.0, 0.0]), None);
    /// assert_eq!(series.first_mismatch(&[1.0, 5.0, -0.0]), Some(2));
    /// ```
    #[must_use]
    pub fn first_mismatch(&self, values: &[T]) -> Option<usize> {
        self.samples.iter().enumerate().find_map(|(i, s)| match s {
            Some(known) if !values.get(i).is_some_and(|v| known.is_identical(*v)) => Some(i),
            _ => None,
        })
    }

    /// Splits the series into its known `(x, y)` points and its gap positions.
    ///
    /// # Errors
    /// - [`Error::EmptySeries`] if the series has no samples
    /// - [`Error::NonFiniteSample`] if a known value is NaN or infinite
    /// - [`Error::InsufficientData`] if fewer than [`MIN_KNOWN_SAMPLES`] values are known
    pub fn known_set(&self) -> Result<KnownSet<T>> {
        if self.is_empty() {
            return Err(Error::EmptySeries);
        }

        let mut points = Vec::with_capacity(self.len());
        let mut gaps = Vec::new();
        for (index, sample) in self.samples.iter().enumerate() {
            match sample {
                Some(y) if !y.is_finite_value() => return Err(Error::NonFiniteSample { index }),
                Some(y) => points.push((T::from_positive_int(index), *y)),
                None => gaps.push(index),
            }
        }

        if points.len() < MIN_KNOWN_SAMPLES {
            return Err(Error::InsufficientData {
                known: points.len(),
                required: MIN_KNOWN_SAMPLES,
            });
        }

        Ok(KnownSet { points, gaps })
    }
}

impl<T: Value> From<Vec<Option<T>>> for Series<T> {
    fn from(samples: Vec<Option<T>>) -> Self {
        Self::new(samples)
    }
}

impl<T: Value> FromIterator<Option<T>> for Series<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The known samples of a series as `(x, y)` points, along with its gap positions.
///
/// Points are sorted by x, since they are taken in series order.
#[derive(Debug, Clone, PartialEq)]
pub struct KnownSet<T: Value> {
    points: Vec<(T, T)>,
    gaps: Vec<usize>,
}

impl<T: Value> KnownSet<T> {
    /// The known `(x, y)` points, in ascending x.
    #[must_use]
    pub fn points(&self) -> &[(T, T)] {
        &self.points
    }

    /// Gap positions, in ascending order.
    #[must_use]
    pub fn gaps(&self) -> &[usize] {
        &self.gaps
    }

    /// Smallest and largest known value.
    #[must_use]
    pub fn y_bounds(&self) -> (T, T) {
        // At least MIN_KNOWN_SAMPLES points exist
        self.points
            .y_bounds()
            .unwrap_or((T::neg_infinity(), T::infinity()))
    }
}
