//! Traits for fitted curves and the fitters that produce them.
//!
//! The imputer only needs two things from a curve fit: build a curve from known
//! `(x, y)` points with a smoothness parameter, and evaluate it at arbitrary `x`.
//! - [`Curve`] is anything that can be evaluated
//! - [`CurveFitter`] builds a [`Curve`] from points
//!
//! [`crate::spline::SplineFitter`] is the default fitter used by [`crate::Imputer`].
//! Any other fitter can be plugged in with [`crate::Imputer::with_fitter`].
use crate::{error::Result, value::Value};

/// A function of one variable that can be evaluated at any `x`.
pub trait Curve<T: Value> {
    /// Evaluates the curve at `x`.
    ///
    /// May return a non-finite value if the curve is degenerate.
    fn y(&self, x: T) -> T;

    /// Evaluates the curve at every `x`, returning `(x, y)` pairs.
    fn solve(&self, x: impl IntoIterator<Item = T>) -> Vec<(T, T)> {
        x.into_iter().map(|x| (x, self.y(x))).collect()
    }
}

/// Builds a [`Curve`] through a set of points.
pub trait CurveFitter<T: Value> {
    /// The type of curve produced by this fitter.
    type Curve: Curve<T>;

    /// Fits a curve through `points`.
    ///
    /// - `points` are sorted by strictly increasing x.
    /// - `smoothness` is the residual budget. `0` asks for an exact interpolation,
    ///   larger values trade closeness of fit for a smoother curve.
    ///
    /// # Errors
    /// Returns an error if no curve could be fitted.
    fn fit(&self, points: &[(T, T)], smoothness: T) -> Result<Self::Curve>;
}
