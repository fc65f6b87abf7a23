//! Filling the gaps in a series.
//!
//! [`Imputer::fill`] runs the whole pipeline on one [`Series`]:
//! 1. Split the known `(index, value)` points from the gap positions
//! 2. Fit a smoothing curve through the known points
//! 3. Evaluate the curve at every gap
//! 4. Clamp each prediction into the range of the known values
//! 5. Replace any prediction that is not finite by linear interpolation between the known points
//! 6. Copy the known values through untouched, and check that they really are untouched
//!
//! The only hard failures are invalid input: an empty series, fewer than two known values,
//! a non-finite known value, or an invalid smoothness. Numerical trouble in the curve fit
//! never surfaces as an error; the affected gaps are filled by the linear fallback instead.
//!
//! ```rust
//! # use gapfill::{Series, fill};
//! let series = Series::<f64>::new(vec![Some(1.0), None, Some(3.0), None, Some(5.0)]);
//! let filled = fill(&series, 0.0).unwrap();
//!
//! assert!(filled.known_preserved());
//! assert_eq!(filled.values()[0], 1.0);
//! assert!((filled.values()[1] - 2.0).abs() < 1e-9);
//! ```
use serde::{Deserialize, Serialize};

use crate::{
    curve::{Curve, CurveFitter},
    error::{Error, Result},
    interpolate::LinearInterpolator,
    series::Series,
    spline::{check_smoothness, SplineFitter},
    statistics,
    value::{CoordExt, Value},
};

/// Settings for an [`Imputer`].
///
/// Loads from JSON or any other serde format; missing fields take their defaults.
/// ```rust
/// # use gapfill::ImputeOptions;
/// let options: ImputeOptions<f64> = serde_json::from_str("{}").unwrap();
/// assert_eq!(options.smoothness, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Value + Deserialize<'de>"))]
pub struct ImputeOptions<T: Value> {
    /// Residual budget for the smoothing curve.
    ///
    /// - `0` interpolates every known value exactly
    /// - Larger values allow the curve to pass further from noisy samples
    ///
    /// Must be finite and non-negative. Defaults to `1.0`.
    pub smoothness: T,
}

impl<T: Value> Default for ImputeOptions<T> {
    fn default() -> Self {
        Self {
            smoothness: T::one(),
        }
    }
}

impl<T: Value> ImputeOptions<T> {
    /// Returns a copy of these options with a different smoothness.
    #[must_use]
    pub fn with_smoothness(mut self, smoothness: T) -> Self {
        self.smoothness = smoothness;
        self
    }
}

/// Fills gaps in a [`Series`] using a smoothing curve, with a linear fallback.
///
/// The curve comes from a [`CurveFitter`]; [`SplineFitter`] by default.
/// An imputer holds no state between calls, and can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Imputer<T: Value, F = SplineFitter<T>> {
    options: ImputeOptions<T>,
    fitter: F,
}

impl<T: Value> Imputer<T> {
    /// Creates an imputer fitting smoothing splines.
    #[must_use]
    pub fn new(options: ImputeOptions<T>) -> Self {
        Self {
            options,
            fitter: SplineFitter::default(),
        }
    }
}

impl<T: Value, F: CurveFitter<T>> Imputer<T, F> {
    /// Creates an imputer that fits its curves with `fitter`.
    pub fn with_fitter(options: ImputeOptions<T>, fitter: F) -> Self {
        Self { options, fitter }
    }

    /// The settings this imputer was built with.
    pub fn options(&self) -> &ImputeOptions<T> {
        &self.options
    }

    /// The curve fitter in use.
    pub fn fitter(&self) -> &F {
        &self.fitter
    }

    /// Fills every gap in `series`.
    ///
    /// Known values are copied to the output unchanged. Every gap receives a finite
    /// value between the smallest and largest known value.
    ///
    /// # Errors
    /// - [`Error::InvalidSmoothness`] if the configured smoothness is negative or not finite
    /// - [`Error::EmptySeries`] if the series has no samples
    /// - [`Error::NonFiniteSample`] if a known value is NaN or infinite
    /// - [`Error::InsufficientData`] if fewer than 2 values are known
    pub fn fill(&self, series: &Series<T>) -> Result<Imputation<T>> {
        let smoothness = self.options.smoothness;
        check_smoothness(smoothness)?;

        let known = series.known_set()?;
        let (y_min, y_max) = known.y_bounds();
        let mut values: Vec<T> = series
            .samples()
            .iter()
            .map(|s| s.unwrap_or(T::nan()))
            .collect();

        let gaps = known.gaps().to_vec();
        if gaps.is_empty() {
            return Ok(Imputation::new(series, values, gaps));
        }

        tracing::debug!(
            samples = series.len(),
            known = known.points().len(),
            gaps = gaps.len(),
            %smoothness,
            "filling series"
        );

        let x: Vec<T> = gaps.iter().map(|i| T::from_positive_int(*i)).collect();
        let (raw, fit_failed) = match self.fitter.fit(known.points(), smoothness) {
            Ok(curve) => {
                if tracing::enabled!(tracing::Level::DEBUG) {
                    let points = known.points();
                    let r2 = statistics::r_squared(points.y_iter(), points.x_iter().map(|x| curve.y(x)));
                    tracing::debug!(r_squared = %r2, "fitted smoothing curve");
                }
                (x.iter().map(|x| curve.y(*x)).collect::<Vec<_>>(), false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "curve fit failed, filling every gap by linear interpolation");
                (vec![T::nan(); gaps.len()], true)
            }
        };

        // Known points are sorted and number at least 2, so this cannot fail
        let fallback = LinearInterpolator::new(known.points().to_vec())?;

        let mut clamped = Vec::new();
        let mut fell_back = Vec::new();
        for ((&index, &x), &raw) in gaps.iter().zip(&x).zip(&raw) {
            values[index] = if raw.is_finite_value() {
                let v = raw.clamp_to(y_min, y_max);
                if v != raw {
                    clamped.push(index);
                }
                v
            } else {
                fell_back.push(index);
                fallback.y(x)
            };
        }

        if !fell_back.is_empty() && !fit_failed {
            tracing::warn!(
                count = fell_back.len(),
                "curve produced non-finite predictions, used linear interpolation"
            );
        }

        let mut imputation = Imputation::new(series, values, gaps);
        imputation.clamped = clamped;
        imputation.fallback = fell_back;
        imputation.fit_failed = fit_failed;
        Ok(imputation)
    }
}

/// Fills every gap in `series` with a smoothing spline of the given smoothness.
///
/// Shorthand for `Imputer::new(ImputeOptions::default().with_smoothness(smoothness)).fill(series)`.
///
/// # Errors
/// See [`Imputer::fill`].
pub fn fill<T: Value>(series: &Series<T>, smoothness: T) -> Result<Imputation<T>> {
    Imputer::new(ImputeOptions::default().with_smoothness(smoothness)).fill(series)
}

/// The result of filling a series.
///
/// Holds the completed values along with a record of how each gap was filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Imputation<T: Value> {
    values: Vec<T>,
    gaps: Vec<usize>,
    clamped: Vec<usize>,
    fallback: Vec<usize>,
    fit_failed: bool,
    first_modified: Option<usize>,
}

impl<T: Value> Imputation<T> {
    /// Wraps completed values, and checks them against the known samples of `source`.
    fn new(source: &Series<T>, values: Vec<T>, gaps: Vec<usize>) -> Self {
        let first_modified = source.first_mismatch(&values);

        if let Some(index) = first_modified {
            tracing::error!(index, "known value was modified during imputation");
            debug_assert!(false, "known value at index {index} was modified during imputation");
        }

        Self {
            values,
            gaps,
            clamped: Vec::new(),
            fallback: Vec::new(),
            fit_failed: false,
            first_modified,
        }
    }

    /// The completed series.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Consumes the result, returning the completed series.
    #[must_use]
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Positions that were gaps in the input.
    #[must_use]
    pub fn gaps(&self) -> &[usize] {
        &self.gaps
    }

    /// Gaps whose curve prediction fell outside the known range and was clamped.
    #[must_use]
    pub fn clamped_gaps(&self) -> &[usize] {
        &self.clamped
    }

    /// Gaps filled by linear interpolation because the curve gave a non-finite value.
    #[must_use]
    pub fn fallback_gaps(&self) -> &[usize] {
        &self.fallback
    }

    /// True if no curve could be fitted, so every gap was filled by linear interpolation.
    #[must_use]
    pub fn fit_failed(&self) -> bool {
        self.fit_failed
    }

    /// True if every known input value appears in the output bit-for-bit.
    #[must_use]
    pub fn known_preserved(&self) -> bool {
        self.first_modified.is_none()
    }

    /// Returns the result only if every known input value was preserved.
    ///
    /// # Errors
    /// Returns [`Error::KnownValueModified`] naming the first overwritten position.
    pub fn verified(self) -> Result<Self> {
        match self.first_modified {
            Some(index) => Err(Error::KnownValueModified { index }),
            None => Ok(self),
        }
    }

    /// Returns true if `index` was a gap in the input.
    #[must_use]
    pub fn is_gap(&self, index: usize) -> bool {
        self.gaps.binary_search(&index).is_ok()
    }

    /// The known samples as `(x, y)` points.
    #[must_use]
    pub fn known_points(&self) -> Vec<(T, T)> {
        self.points()
            .filter(|(i, _)| !self.is_gap(*i))
            .map(|(_, p)| p)
            .collect()
    }

    /// The filled gaps as `(x, y)` points.
    #[must_use]
    pub fn imputed_points(&self) -> Vec<(T, T)> {
        self.gaps
            .iter()
            .map(|&i| (T::from_positive_int(i), self.values[i]))
            .collect()
    }

    /// Every value of the completed series as an `(x, y)` point.
    #[must_use]
    pub fn completed_points(&self) -> Vec<(T, T)> {
        self.points().map(|(_, p)| p).collect()
    }

    fn points(&self) -> impl Iterator<Item = (usize, (T, T))> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, y)| (i, (T::from_positive_int(i), *y)))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{assert_all_close, assert_close, assert_completed, assert_known_preserved};

    /// Produces the same value everywhere, standing in for a broken fit.
    struct ConstantFitter(f64);
    struct ConstantCurve(f64);

    impl Curve<f64> for ConstantCurve {
        fn y(&self, _: f64) -> f64 {
            self.0
        }
    }

    impl CurveFitter<f64> for ConstantFitter {
        type Curve = ConstantCurve;
        fn fit(&self, _: &[(f64, f64)], _: f64) -> Result<ConstantCurve> {
            Ok(ConstantCurve(self.0))
        }
    }

    struct FailingFitter;
    impl CurveFitter<f64> for FailingFitter {
        type Curve = ConstantCurve;
        fn fit(&self, _: &[(f64, f64)], _: f64) -> Result<ConstantCurve> {
            Err(Error::Algebra("always fails"))
        }
    }

    fn ragged() -> Series<f64> {
        Series::new(vec![
            Some(0.0),
            None,
            Some(4.0),
            None,
            None,
            Some(1.0),
            None,
        ])
    }

    // Linear interpolation between nearest known neighbours, clamped at the end
    const RAGGED_LINEAR: [f64; 7] = [0.0, 2.0, 4.0, 3.0, 2.0, 1.0, 1.0];

    #[test]
    fn odd_gaps_in_linear_data() {
        let series = Series::new(vec![Some(1.0), None, Some(3.0), None, Some(5.0)]);
        let filled = fill(&series, 0.0).unwrap();

        assert_known_preserved!(series, filled.values());
        assert_completed!(series, filled.values());
        assert_close!(filled.values()[1], 2.0, 1e-9);
        assert_close!(filled.values()[3], 4.0, 1e-9);
        assert_eq!(filled.gaps(), &[1, 3]);
        assert!(filled.fallback_gaps().is_empty());
    }

    #[test]
    fn leading_gaps_are_clamped() {
        let series = Series::new(vec![None, None, Some(1.0), Some(2.0)]);
        let filled = fill(&series, 1.0).unwrap();

        assert_known_preserved!(series, filled.values());
        assert_completed!(series, filled.values());

        // The line through the known pair gives -1 and 0, both below the known range
        assert_eq!(filled.values(), &[1.0, 1.0, 1.0, 2.0]);
        assert_eq!(filled.clamped_gaps(), &[0, 1]);
    }

    #[test]
    fn insufficient_known_values() {
        for samples in [vec![None, None, None], vec![None, Some(1.0), None], vec![Some(3.0)]] {
            let series = Series::new(samples);
            assert!(matches!(
                fill(&series, 1.0),
                Err(Error::InsufficientData { required: 2, .. })
            ));
        }
    }

    #[test]
    fn complete_series_is_unchanged() {
        let series = Series::complete(vec![3.0, -1.0, 0.0, 7.25]);
        let filled = fill(&series, 1.0).unwrap();
        assert_eq!(filled.values(), &[3.0, -1.0, 0.0, 7.25]);
        assert!(filled.gaps().is_empty());
        assert!(filled.known_preserved());
    }

    #[test]
    fn signed_zero_survives() {
        let series = Series::new(vec![Some(-0.0_f64), None, Some(1.0)]);
        let filled = fill(&series, 0.0).unwrap();
        assert!(filled.values()[0].is_sign_negative());
        assert_known_preserved!(series, filled.values());
    }

    #[test]
    fn nan_prediction_falls_back_to_linear() {
        let series = ragged();
        let imputer = Imputer::with_fitter(ImputeOptions::default(), ConstantFitter(f64::NAN));
        let filled = imputer.fill(&series).unwrap();

        assert_all_close!(filled.values(), RAGGED_LINEAR);
        assert_eq!(filled.fallback_gaps(), &[1, 3, 4, 6]);
        assert!(filled.clamped_gaps().is_empty());
        assert!(!filled.fit_failed());
    }

    #[test]
    fn infinite_prediction_falls_back_to_linear() {
        for inf in [f64::INFINITY, f64::NEG_INFINITY] {
            let imputer = Imputer::with_fitter(ImputeOptions::default(), ConstantFitter(inf));
            let filled = imputer.fill(&ragged()).unwrap();
            assert_all_close!(filled.values(), RAGGED_LINEAR);
            assert_eq!(filled.fallback_gaps().len(), 4);
        }
    }

    #[test]
    fn failed_fit_falls_back_to_linear() {
        let imputer = Imputer::with_fitter(ImputeOptions::default(), FailingFitter);
        let filled = imputer.fill(&ragged()).unwrap();

        assert!(filled.fit_failed());
        assert_all_close!(filled.values(), RAGGED_LINEAR);
        assert!(filled.known_preserved());
    }

    #[test]
    fn out_of_range_prediction_is_clamped() {
        let series = ragged();
        let high = Imputer::with_fitter(ImputeOptions::default(), ConstantFitter(100.0))
            .fill(&series)
            .unwrap();
        assert_eq!(high.values(), &[0.0, 4.0, 4.0, 4.0, 4.0, 1.0, 4.0]);
        assert_eq!(high.clamped_gaps(), &[1, 3, 4, 6]);

        let low = Imputer::with_fitter(ImputeOptions::default(), ConstantFitter(-3.0))
            .fill(&series)
            .unwrap();
        assert_eq!(low.values(), &[0.0, 0.0, 4.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn reconstructs_smooth_signal() {
        let truth: Vec<f64> = (0..200).map(|i| (f64::from(i) / 10.0).sin() * 5.0).collect();
        let series: Series<f64> = truth
            .iter()
            .enumerate()
            .map(|(i, y)| (i % 7 != 3 || i > 195).then_some(*y))
            .collect();

        let filled = fill(&series, 0.0).unwrap();
        assert_known_preserved!(series, filled.values());
        assert_completed!(series, filled.values());

        let error = statistics::max_absolute_error(truth.iter().copied(), filled.values().iter().copied());
        assert!(error < 1e-3, "max error {error}");
    }

    #[test]
    fn smoothing_stays_in_range() {
        let series = Series::new(vec![
            Some(1.0),
            Some(9.0),
            None,
            Some(2.0),
            Some(8.0),
            None,
            None,
            Some(3.0),
        ]);
        for s in [0.0, 1.0, 10.0, 1e6] {
            let filled = fill(&series, s).unwrap();
            assert_known_preserved!(series, filled.values());
            assert_completed!(series, filled.values());
        }
    }

    #[test]
    fn invalid_input() {
        let series = Series::new(vec![Some(1.0), None, Some(2.0)]);
        assert!(matches!(fill(&series, -1.0), Err(Error::InvalidSmoothness(_))));
        assert!(matches!(fill(&series, f64::NAN), Err(Error::InvalidSmoothness(_))));

        let series = Series::new(vec![Some(1.0), None, Some(f64::NAN)]);
        assert!(matches!(
            fill(&series, 1.0),
            Err(Error::NonFiniteSample { index: 2 })
        ));

        assert!(matches!(
            fill(&Series::<f64>::new(vec![]), 1.0),
            Err(Error::EmptySeries)
        ));
    }

    #[test]
    fn verification_reports_first_modified() {
        let good = fill(&ragged(), 1.0).unwrap();
        assert!(good.clone().verified().is_ok());

        let bad = Imputation {
            first_modified: Some(2),
            ..good
        };
        assert!(!bad.known_preserved());
        assert!(matches!(
            bad.verified(),
            Err(Error::KnownValueModified { index: 2 })
        ));
    }

    #[test]
    fn point_views() {
        let series = Series::new(vec![Some(1.0), None, Some(3.0)]);
        let filled = fill(&series, 0.0).unwrap();

        assert_eq!(filled.known_points(), vec![(0.0, 1.0), (2.0, 3.0)]);
        assert_eq!(filled.imputed_points().len(), 1);
        assert_eq!(filled.completed_points().len(), 3);
        assert!(filled.is_gap(1));
        assert!(!filled.is_gap(0));
    }

    #[test]
    fn options_from_json() {
        let options: ImputeOptions<f64> = serde_json::from_str(r#"{ "smoothness": 0.0 }"#).unwrap();
        let imputer = Imputer::new(options);
        assert_eq!(imputer.options().smoothness, 0.0);
        assert_eq!(ImputeOptions::<f64>::default().with_smoothness(3.0).smoothness, 3.0);
    }
}
