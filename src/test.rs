//! Assertions for testing gap filling.
//!
//! These macros are exported for use in your own tests, and are used throughout this crate's.
//!
//! ### [`crate::assert_close`]
//! Asserts that two floating-point values are approximately equal.
//! - Without a tolerance, allows a few ulps relative to the larger of the two values.
//! - `assert_eq!` equivalent for floats.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] over two slices of equal length.
//!
//! ### [`crate::assert_known_preserved`]
//! Asserts that every known value of a [`crate::Series`] appears unchanged, bit-for-bit, in a filled output.
//!
//! ### [`crate::assert_completed`]
//! Asserts that a filled output has no gaps left:
//! - Same length as the input series.
//! - Every value is finite.
//! - Every filled gap lies within the range of the known values.
//!
//! ```rust
//! # use gapfill::{Series, fill, assert_known_preserved, assert_completed};
//! let series = Series::new(vec![Some(2.0), None, None, Some(8.0)]);
//! let filled = fill(&series, 0.0).unwrap();
//!
//! assert_known_preserved!(series, filled.values());
//! assert_completed!(series, filled.values());
//! ```
use crate::{
    series::Series,
    value::{CoordExt, Value},
};


/// Default tolerance for [`crate::assert_close`]: four ulps of the larger magnitude, at least of 1.
#[doc(hidden)]
pub fn default_tolerance<T: Value>(a: T, b: T) -> T {
    let scale = nalgebra::RealField::max(nalgebra::RealField::max(Value::abs(a), Value::abs(b)), T::one());
    T::epsilon() * scale * T::from_positive_int(4)
}

#[doc(hidden)]
pub fn is_close<T: Value>(a: T, b: T, tolerance: T) -> bool {
    a == b || Value::abs(a - b) <= tolerance
}

/// Checks that `values` completes `series`, describing the first problem found.
#[doc(hidden)]
pub fn check_completed<T: Value>(series: &Series<T>, values: &[T]) -> Result<(), String> {
    if series.len() != values.len() {
        return Err(format!(
            "Length mismatch: series has {} samples, output has {}",
            series.len(),
            values.len()
        ));
    }

    if let Some(i) = values.iter().position(|v| !v.is_finite_value()) {
        return Err(format!("Output [{i}] is not finite: {}", values[i]));
    }

    let known: Vec<(T, T)> = series
        .samples()
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.map(|y| (T::from_positive_int(i), y)))
        .collect();
    if let Some((min, max)) = known.y_bounds() {
        for i in series.gaps() {
            if values[i] < min || values[i] > max {
                return Err(format!(
                    "Filled gap [{i}] = {} is outside the known range [{min}, {max}]",
                    values[i]
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{assert_all_close, assert_close, assert_completed, assert_known_preserved, Series};

    #[test]
    fn test_assert_close_macro() {
        assert_close!(1.0 + 1e-16, 1.0);
        assert_close!(1e9 + 1e-7, 1e9);
        assert_close!(0.1, 0.2, 0.5, "Within {}", 0.5);
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_fails() {
        assert_close!(1.0, 1.001);
    }

    #[test]
    fn test_assert_all_close_macro() {
        let a = [1.0, 2.0, 3.0];
        let b = vec![1.0 + 1e-16, 2.0, 3.0];
        assert_all_close!(a, b);
        assert_all_close!(a, [1.1, 2.1, 2.9], 0.2);
    }

    #[test]
    fn test_assert_known_preserved_macro() {
        let series = Series::new(vec![Some(1.0), None, Some(-0.0)]);
        assert_known_preserved!(series, [1.0, 42.0, -0.0]);
    }

    #[test]
    #[should_panic(expected = "index 2")]
    fn test_assert_known_preserved_detects_sign() {
        let series = Series::new(vec![Some(1.0), None, Some(-0.0)]);
        assert_known_preserved!(series, vec![1.0, 42.0, 0.0]);
    }

    #[test]
    fn test_assert_completed_macro() {
        let series = Series::new(vec![Some(1.0), None, Some(3.0)]);
        assert_completed!(series, [1.0, 2.5, 3.0]);
    }

    #[test]
    #[should_panic(expected = "outside the known range")]
    fn test_assert_completed_range() {
        let series = Series::new(vec![Some(1.0), None, Some(3.0)]);
        assert_completed!(series, [1.0, 3.5, 3.0]);
    }

    #[test]
    #[should_panic(expected = "not finite")]
    fn test_assert_completed_finite() {
        let series = Series::new(vec![Some(1.0), None, Some(3.0)]);
        assert_completed!(series, [1.0, f64::NAN, 3.0]);
    }
}
