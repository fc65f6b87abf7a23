//! Numeric types and coordinate utilities for gap filling.
//!
//! This module defines the [`Value`] trait, which abstracts the numeric
//! types that can be used in series, fitted curves and imputation results,
//! ensuring compatibility with nalgebra, floating-point operations, and formatting.
//!
//! # Traits
//!
//! - [`Value`]: Extends `FloatCore`, `Scalar`, and `RealField` to provide:
//!   - A canonical `two()` constant.
//!   - `try_cast` for safe type conversion with error handling.
//!   - `is_finite_value` and `clamp_to`, which behave identically for every
//!     float type and never hide a NaN.
//! - [`CoordExt`]: Access to the `x` and `y` channels of a set of `(x, y)` points.
//!
//! # Example
//!
//! ```rust
//! use gapfill::value::{CoordExt, Value};
//!
//! let points: Vec<(f64, f64)> = vec![(0.0, 2.0), (1.0, -1.0), (2.0, 5.0)];
//! assert_eq!(points.y_bounds(), Some((-1.0, 5.0)));
//!
//! // NaN passes through a clamp untouched
//! assert!(f64::NAN.clamp_to(0.0, 1.0).is_nan());
//! ```
use crate::error::Error;

/// Numeric type for series and curves
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Returns true if the value is neither NaN nor infinite
    fn is_finite_value(self) -> bool {
        num_traits::float::FloatCore::is_finite(self)
    }

    /// Restricts the value to `[min, max]`.
    ///
    /// Infinities are pulled onto the nearest bound. NaN compares false against
    /// both bounds and is returned unchanged.
    #[must_use]
    fn clamp_to(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }

    /// Returns true if both values are the same number, including the sign of zero.
    fn is_identical(self, other: Self) -> bool {
        self == other
            && num_traits::float::FloatCore::is_sign_negative(self)
                == num_traits::float::FloatCore::is_sign_negative(other)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// `(x, y)` channel access for point sets.
///
/// ```
/// # use gapfill::value::CoordExt;
/// let data: Vec<(f64, f64)> = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// let ys: Vec<f64> = data.y_iter().collect();
/// assert_eq!(ys, vec![-2.0, 3.0, 1.0]);
/// ```
pub trait CoordExt<T: Value> {
    /// The points themselves.
    fn coords(&self) -> &[(T, T)];

    /// Iterates over the x-coordinates.
    fn x_iter(&self) -> impl Iterator<Item = T> + '_ {
        self.coords().iter().map(|p| p.0)
    }

    /// Iterates over the y-coordinates.
    fn y_iter(&self) -> impl Iterator<Item = T> + '_ {
        self.coords().iter().map(|p| p.1)
    }

    /// Smallest and largest y-coordinate; `None` without points.
    fn y_bounds(&self) -> Option<(T, T)> {
        let mut ys = self.y_iter();
        let first = ys.next()?;
        Some(ys.fold((first, first), |(lo, hi), y| {
            (nalgebra::RealField::min(lo, y), nalgebra::RealField::max(hi, y))
        }))
    }

    /// Copies the points into `f64`, for drawing.
    ///
    /// # Errors
    /// [`Error::CastFailed`] if a coordinate has no `f64` representation.
    fn as_f64(&self) -> crate::error::Result<Vec<(f64, f64)>> {
        let cast = |v: T| num_traits::cast::<T, f64>(v).ok_or(Error::CastFailed);
        self.coords()
            .iter()
            .map(|&(x, y)| Ok((cast(x)?, cast(y)?)))
            .collect()
    }
}

impl<T: Value> CoordExt<T> for Vec<(T, T)> {
    fn coords(&self) -> &[(T, T)] {
        self
    }
}

impl<T: Value> CoordExt<T> for &[(T, T)] {
    fn coords(&self) -> &[(T, T)] {
        self
    }
}
