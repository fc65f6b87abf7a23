//! Summary statistics for series and fitted curves
//!
//! Used to report on spline fits, to size plots and synthetic noise, and to measure how
//! close a filled series comes to the truth when gaps were punched into known data.
//!
//! # Fit quality
//! - [`r_squared`]: Share of the variance in the data that a curve explains. `1` is a perfect fit.
//! - [`root_mean_squared_error`]: Typical error, in the units of the data.
//! - [`max_absolute_error`]: Worst single error.
//!
//! # Description
//! - [`mean`], [`stddev_and_mean`] and [`spread`]
//!
//! ```rust
//! use gapfill::{fill, statistics, Series};
//!
//! let truth = [0.0, 1.0, 4.0, 9.0, 16.0];
//! let series = Series::new(vec![Some(0.0), Some(1.0), None, Some(9.0), Some(16.0)]);
//! let filled = fill(&series, 0.0).unwrap();
//!
//! let worst = statistics::max_absolute_error(truth.into_iter(), filled.values().iter().copied());
//! assert!(worst < 0.5);
//! ```
use crate::value::Value;

/// Coefficient of determination of `y_fit` against `y`.
///
/// Negative when the curve does worse than the flat line through the mean of `y`.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 − Σ (yᵢ − ŷᵢ)² / Σ (yᵢ − ȳ)²
/// ```
/// </div>
///
/// Pairs are taken until either iterator runs out. Constant `y` gives NaN or `-inf`.
pub fn r_squared<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let pairs: Vec<(T, T)> = y.zip(y_fit).collect();
    let y_mean = mean(pairs.iter().map(|(y, _)| *y));

    let (ss_residual, ss_total) =
        pairs
            .iter()
            .fold((T::zero(), T::zero()), |(res, tot), &(y, y_fit)| {
                (
                    res + Value::powi(y - y_fit, 2),
                    tot + Value::powi(y - y_mean, 2),
                )
            });

    T::one() - ss_residual / ss_total
}

/// Square root of the mean squared difference between `y` and `y_fit`.
///
/// NaN when there is nothing to compare.
///
/// ```
/// # use gapfill::statistics::root_mean_squared_error;
/// let rmse = root_mean_squared_error([1.0, 2.0, 3.0].into_iter(), [1.0, 2.0, 5.0].into_iter());
/// assert!((rmse - (4.0f64 / 3.0).sqrt()).abs() < 1e-12);
/// ```
pub fn root_mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean(y.zip(y_fit).map(|(y, y_fit)| Value::powi(y - y_fit, 2))).sqrt()
}

/// Largest absolute difference between `y` and `y_fit`; zero when there is nothing to compare.
pub fn max_absolute_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    y.zip(y_fit)
        .map(|(y, y_fit)| Value::abs(y - y_fit))
        .fold(T::zero(), |worst, e| if e > worst { e } else { worst })
}

/// Arithmetic mean; NaN for an empty iterator.
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let (sum, n) = data.fold((T::zero(), 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        return T::nan();
    }
    sum / T::from_positive_int(n)
}

/// Population standard deviation (dividing by `N`) and mean, as `(stddev, mean)`.
///
/// ```rust
/// # use gapfill::statistics::stddev_and_mean;
/// let (s, m) = stddev_and_mean([1.0, 2.0, 3.0].into_iter());
/// assert_eq!(m, 2.0);
/// assert!((s - (2.0f64 / 3.0).sqrt()).abs() < 1e-15);
/// ```
pub fn stddev_and_mean<T: Value>(data: impl Iterator<Item = T>) -> (T, T) {
    let data: Vec<T> = data.collect();
    let m = mean(data.iter().copied());
    let variance = mean(data.iter().map(|v| Value::powi(*v - m, 2)));
    (variance.sqrt(), m)
}

/// Distance between the largest and smallest value; `-inf` for an empty iterator.
pub fn spread<T: Value>(data: impl Iterator<Item = T>) -> T {
    let (lo, hi) = data.fold((T::infinity(), T::neg_infinity()), |(lo, hi), v| {
        (if v < lo { v } else { lo }, if v > hi { v } else { hi })
    });
    hi - lo
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn r_squared_bounds() {
        let y = [1.0, 2.0, 3.0];
        assert_eq!(r_squared::<f64>(y.into_iter(), y.into_iter()), 1.0);

        // Flat line at the mean explains nothing
        assert_eq!(r_squared::<f64>(y.into_iter(), [2.0; 3].into_iter()), 0.0);

        // Residual 194 against a total of 2
        assert_eq!(r_squared::<f64>(y.into_iter(), [10.0; 3].into_iter()), -96.0);
    }

    #[test]
    fn error_metrics() {
        let y = [0.0, 1.0, 2.0, 3.0];
        let y_fit = [0.0, 1.0, 2.0, 5.0];
        assert_eq!(root_mean_squared_error::<f64>(y.into_iter(), y_fit.into_iter()), 1.0);
        assert_eq!(max_absolute_error::<f64>(y.into_iter(), y_fit.into_iter()), 2.0);

        assert!(root_mean_squared_error::<f64>([].into_iter(), [].into_iter()).is_nan());
        assert_eq!(max_absolute_error::<f64>([].into_iter(), [].into_iter()), 0.0);
    }

    #[test]
    fn descriptive() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let (dev, m) = stddev_and_mean::<f64>(data.into_iter());
        assert_eq!(m, 5.0);
        assert_eq!(dev, 2.0);
        assert_eq!(spread::<f64>(data.into_iter()), 7.0);
        assert!(mean::<f64>(std::iter::empty()).is_nan());
        assert_eq!(spread::<f64>(std::iter::empty()), f64::NEG_INFINITY);
    }
}
