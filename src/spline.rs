//! Cubic smoothing splines.
//!
//! A smoothing spline is the smoothest curve (least integrated squared second derivative)
//! whose squared residuals against the data stay within a budget `S`:
//! ```math
//! minimize ∫ g''(x)² dx   subject to   Σ (yᵢ − g(xᵢ))² ≤ S
//! ```
//!
//! - `S = 0` gives the natural interpolating cubic spline through every point
//! - As `S` grows the curve relaxes, until at `S ≥ RSS(least-squares line)` it becomes that line
//!
//! The fit uses Reinsch's algorithm: for a Lagrange multiplier `p` the spline coefficients
//! come from the banded system `(QᵀQ + pT) u = Qᵀy`, and `p` is found by Newton iteration so
//! that the residual sum of squares matches `S`.
//!
//! ```rust
//! # use gapfill::spline::SmoothingSpline;
//! # use gapfill::curve::Curve;
//! let points: Vec<(f64, f64)> = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 5.0)];
//!
//! // Passes through every point
//! let exact = SmoothingSpline::fit(&points, 0.0).unwrap();
//! assert!((exact.y(1.0) - 3.0).abs() < 1e-12);
//!
//! // Allowed a total squared residual of 1.0
//! let smooth = SmoothingSpline::fit(&points, 1.0).unwrap();
//! assert!((smooth.residual_sum_of_squares() - 1.0).abs() < 1e-4);
//! ```
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::{
    curve::{Curve, CurveFitter},
    error::{Error, Result},
    series::MIN_KNOWN_SAMPLES,
    value::Value,
};

mod banded;
pub use banded::{BandLdlt, SymmetricBand};

/// Default cap on Newton iterations when searching for the Lagrange multiplier.
pub const DEFAULT_MAX_ITERATIONS: usize = 64;

/// Checks that a smoothness budget is finite and non-negative.
///
/// # Errors
/// Returns [`Error::InvalidSmoothness`] otherwise.
pub fn check_smoothness<T: Value>(smoothness: T) -> Result<()> {
    if smoothness.is_finite_value() && smoothness >= T::zero() {
        Ok(())
    } else {
        Err(Error::InvalidSmoothness(format!("{smoothness}")))
    }
}

/// A fitted cubic smoothing spline.
///
/// Between knots `xᵢ ≤ x < xᵢ₊₁` the curve is
/// `g(x) = aᵢ + bᵢt + cᵢt² + dᵢt³` with `t = x − xᵢ`.
///
/// Outside the knots the curve continues as a straight line with the end slope,
/// since a natural spline has zero curvature at its ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingSpline<T: Value> {
    knots: Vec<T>,
    a: Vec<T>,
    b: Vec<T>,
    c: Vec<T>,
    d: Vec<T>,

    rss: T,
    p: T,
    iterations: usize,
}

impl<T: Value> SmoothingSpline<T> {
    /// Fits a smoothing spline with the default iteration settings.
    ///
    /// See [`SplineFitter`] to control the Newton iteration.
    ///
    /// # Errors
    /// - [`Error::InsufficientData`] with fewer than 2 points
    /// - [`Error::NonFiniteSample`] if a coordinate is NaN or infinite
    /// - [`Error::UnsortedInput`] if x is not strictly increasing
    /// - [`Error::InvalidSmoothness`] if `smoothness` is negative or not finite
    /// - [`Error::Algebra`] if the banded system cannot be factored
    pub fn fit(points: &[(T, T)], smoothness: T) -> Result<Self> {
        SplineFitter::default().fit(points, smoothness)
    }

    /// The x-coordinates of the knots.
    #[must_use]
    pub fn knots(&self) -> &[T] {
        &self.knots
    }

    /// Value of the spline at each knot.
    #[must_use]
    pub fn knot_values(&self) -> &[T] {
        &self.a
    }

    /// `Σ (yᵢ − g(xᵢ))²` over the fitted points.
    #[must_use]
    pub fn residual_sum_of_squares(&self) -> T {
        self.rss
    }

    /// The Lagrange multiplier `p` balancing smoothness against closeness of fit.
    ///
    /// - `0` for the least-squares line
    /// - infinite for an exact interpolation
    #[must_use]
    pub fn lagrange_multiplier(&self) -> T {
        self.p
    }

    /// Number of Newton iterations used to match the smoothness budget.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Builds the piecewise coefficients from the knot values and the `t²` coefficients.
    fn from_coefficients(knots: Vec<T>, a: Vec<T>, c: Vec<T>, rss: T, p: T, iterations: usize) -> Self {
        let three = T::two() + T::one();
        let n = knots.len();
        let mut b = Vec::with_capacity(n - 1);
        let mut d = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            let h = knots[i + 1] - knots[i];
            d.push((c[i + 1] - c[i]) / (three * h));
            b.push((a[i + 1] - a[i]) / h - h * (T::two() * c[i] + c[i + 1]) / three);
        }

        Self {
            knots,
            a,
            b,
            c,
            d,
            rss,
            p,
            iterations,
        }
    }

    /// Slope at the right-most knot.
    fn end_slope(&self) -> T {
        let i = self.b.len() - 1;
        let h = self.knots[i + 1] - self.knots[i];
        self.b[i] + T::two() * self.c[i] * h + (T::two() + T::one()) * self.d[i] * h * h
    }
}

impl<T: Value> Curve<T> for SmoothingSpline<T> {
    fn y(&self, x: T) -> T {
        let n = self.knots.len();
        if x.is_nan() {
            return x;
        } else if x <= self.knots[0] {
            return self.a[0] + self.b[0] * (x - self.knots[0]);
        } else if x >= self.knots[n - 1] {
            return self.a[n - 1] + self.end_slope() * (x - self.knots[n - 1]);
        }

        let i = self.knots.partition_point(|k| *k <= x) - 1;
        let t = x - self.knots[i];
        self.a[i] + t * (self.b[i] + t * (self.c[i] + t * self.d[i]))
    }
}

/// Fits [`SmoothingSpline`]s, matching the smoothness budget by safeguarded Newton iteration.
///
/// The default settings allow [`DEFAULT_MAX_ITERATIONS`] iterations and stop once the
/// residual sum of squares is within a relative `1e-6` of the budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Value + Deserialize<'de>"))]
pub struct SplineFitter<T: Value> {
    /// Upper bound on Newton iterations. The last iterate is kept if it is reached.
    pub max_iterations: usize,

    /// Relative tolerance on `|RSS − S| / S` for convergence.
    pub tolerance: T,
}

impl<T: Value> Default for SplineFitter<T> {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: T::try_cast(1e-6).unwrap_or(T::epsilon()),
        }
    }
}

impl<T: Value> CurveFitter<T> for SplineFitter<T> {
    type Curve = SmoothingSpline<T>;

    fn fit(&self, points: &[(T, T)], smoothness: T) -> Result<SmoothingSpline<T>> {
        check_smoothness(smoothness)?;
        validate_points(points)?;

        let knots: Vec<T> = points.iter().map(|(x, _)| *x).collect();
        let y: Vec<T> = points.iter().map(|(_, y)| *y).collect();

        if points.len() == MIN_KNOWN_SAMPLES {
            let c = vec![T::zero(); 2];
            return Ok(SmoothingSpline::from_coefficients(knots, y, c, T::zero(), T::zero(), 0));
        }

        let system = ReinschSystem::new(&knots, &y);
        if smoothness == T::zero() {
            let c = system.interpolate()?;
            return Ok(SmoothingSpline::from_coefficients(knots, y, c, T::zero(), T::infinity(), 0));
        }

        let (state, iterations) = self.find_multiplier(&system, smoothness)?;
        let a = y.iter().zip(state.qu.iter()).map(|(y, r)| *y - *r).collect();
        let c = system.pad(&(state.u.clone() * state.p));

        Ok(SmoothingSpline::from_coefficients(knots, a, c, state.rss, state.p, iterations))
    }
}

impl<T: Value> SplineFitter<T> {
    /// Searches for the multiplier `p` with `F(p) = S`.
    ///
    /// `F` decreases monotonically from the least-squares residual at `p = 0` towards
    /// zero as `p → ∞`. Newton steps are taken on `F^(-1/2) − S^(-1/2)`, which is close
    /// to linear in `p`, and fall back to bisection whenever a step leaves the bracket.
    fn find_multiplier(&self, system: &ReinschSystem<T>, smoothness: T) -> Result<(Solution<T>, usize)> {
        let mut state = system.solve_at(T::zero())?;
        if state.rss <= smoothness {
            tracing::debug!("smoothness budget admits the least-squares line");
            return Ok((state, 0));
        }

        let ten = T::from_positive_int(10);
        let (mut lo, mut hi) = (T::zero(), T::infinity());
        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;

            let slope = state.f - state.p * state.g;
            let step = state.rss * ((state.rss / smoothness).sqrt() - T::one()) / slope;
            let mut next = state.p + step;
            if !next.is_finite_value() || next <= lo || next >= hi {
                next = if hi.is_finite_value() {
                    (lo + hi) / T::two()
                } else if lo > T::zero() {
                    lo * ten
                } else {
                    T::one()
                };
            }

            state = system.solve_at(next)?;
            if Value::abs(state.rss - smoothness) <= self.tolerance * smoothness {
                break;
            } else if state.rss > smoothness {
                lo = state.p;
            } else {
                hi = state.p;
            }
        }

        tracing::debug!(
            iterations,
            multiplier = %state.p,
            rss = %state.rss,
            "smoothing spline converged"
        );
        Ok((state, iterations))
    }
}

fn validate_points<T: Value>(points: &[(T, T)]) -> Result<()> {
    if points.len() < MIN_KNOWN_SAMPLES {
        return Err(Error::InsufficientData {
            known: points.len(),
            required: MIN_KNOWN_SAMPLES,
        });
    }

    if let Some(index) = points
        .iter()
        .position(|(x, y)| !x.is_finite_value() || !y.is_finite_value())
    {
        return Err(Error::NonFiniteSample { index });
    }

    if let Some(i) = points.windows(2).position(|w| w[1].0 <= w[0].0) {
        return Err(Error::UnsortedInput(i + 1));
    }

    Ok(())
}

/// The matrices of Reinsch's algorithm for one set of knots.
///
/// With `n` knots there are `m = n − 2` interior unknowns:
/// - `T` is the `m × m` tridiagonal matrix linking the `t²` coefficients
/// - `Qᵀ` is the `m × n` second-difference operator
struct ReinschSystem<T: Value> {
    r: Vec<T>,
    t: SymmetricBand<T>,
    qtq: SymmetricBand<T>,
    qty: DVector<T>,
}

/// The spline state for one value of the multiplier.
struct Solution<T: Value> {
    p: T,
    u: DVector<T>,

    /// `Qu`, the residuals `y − a`
    qu: Vec<T>,
    rss: T,

    /// `uᵀTu`
    f: T,

    /// `(Tu)ᵀ R⁻¹ (Tu)`
    g: T,
}

impl<T: Value> ReinschSystem<T> {
    fn new(x: &[T], y: &[T]) -> Self {
        let n = x.len();
        let m = n - 2;
        let three = T::two() + T::one();

        let h: Vec<T> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let r: Vec<T> = h.iter().map(|h| T::one() / *h).collect();
        let mid = |j: usize| -(r[j] + r[j + 1]);

        let mut t = SymmetricBand::zeros(m);
        let mut qtq = SymmetricBand::zeros(m);
        let mut qty = DVector::zeros(m);
        for j in 0..m {
            t.set_diag(j, T::two() * (h[j] + h[j + 1]) / three);
            qtq.set_diag(j, r[j] * r[j] + mid(j) * mid(j) + r[j + 1] * r[j + 1]);
            qty[j] = r[j] * y[j] + mid(j) * y[j + 1] + r[j + 1] * y[j + 2];

            if j + 1 < m {
                t.set_upper1(j, h[j + 1] / three);
                qtq.set_upper1(j, mid(j) * r[j + 1] + r[j + 1] * mid(j + 1));
            }
            if j + 2 < m {
                qtq.set_upper2(j, r[j + 1] * r[j + 2]);
            }
        }

        Self { r, t, qtq, qty }
    }

    /// Natural interpolating spline: solves `T c = Qᵀy`.
    fn interpolate(&self) -> Result<Vec<T>> {
        let c = self.t.factor()?.solve(&self.qty);
        Ok(self.pad(&c))
    }

    /// Solves `(QᵀQ + pT) u = Qᵀy` and the quantities the Newton step needs.
    fn solve_at(&self, p: T) -> Result<Solution<T>> {
        let ldlt = self.qtq.scaled_add(&self.t, p).factor()?;
        let u = ldlt.solve(&self.qty);

        let qu = self.apply_q(&u);
        let rss = qu.iter().fold(T::zero(), |acc, v| acc + *v * *v);

        let tu = self.t.mul_vector(&u);
        let f = u.dot(&tu);
        let g = tu.dot(&ldlt.solve(&tu));

        Ok(Solution { p, u, qu, rss, f, g })
    }

    /// Computes `Q u`, a vector over all `n` knots.
    fn apply_q(&self, u: &DVector<T>) -> Vec<T> {
        let m = u.len();
        let r = &self.r;
        (0..m + 2)
            .map(|i| {
                let mut v = T::zero();
                if i < m {
                    v = v + r[i] * u[i];
                }
                if i >= 1 && i - 1 < m {
                    v = v - (r[i - 1] + r[i]) * u[i - 1];
                }
                if i >= 2 {
                    v = v + r[i - 1] * u[i - 2];
                }
                v
            })
            .collect()
    }

    /// Extends interior coefficients with the zero natural end conditions.
    fn pad(&self, interior: &DVector<T>) -> Vec<T> {
        std::iter::once(T::zero())
            .chain(interior.iter().copied())
            .chain(std::iter::once(T::zero()))
            .collect()
    }
}
