//! Piecewise-linear interpolation.
//!
//! This is the fallback used by the imputer whenever the smoothing curve
//! produces a non-finite prediction. It is always defined once two points are
//! known, and never leaves the range of the known values.
use crate::{
    curve::Curve,
    error::{Error, Result},
    series::MIN_KNOWN_SAMPLES,
    value::Value,
};

/// Piecewise-linear interpolation between known points.
///
/// Between two neighbouring points the value is the straight line joining them.
/// Outside the known x-range the nearest end value is used, so the result is always
/// within the range of the known y-values.
///
/// # Example
/// ```
/// # use gapfill::{interpolate::LinearInterpolator, curve::Curve};
/// let line = LinearInterpolator::new(vec![(0.0, 0.0), (2.0, 4.0), (4.0, 0.0)]).unwrap();
/// assert_eq!(line.y(1.0), 2.0);
/// assert_eq!(line.y(3.0), 2.0);
/// assert_eq!(line.y(-10.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator<T: Value> {
    points: Vec<(T, T)>,
}

impl<T: Value> LinearInterpolator<T> {
    /// Creates an interpolator over `points`.
    ///
    /// # Errors
    /// - [`Error::InsufficientData`] if fewer than 2 points are given
    /// - [`Error::UnsortedInput`] if the x-values are not strictly increasing
    pub fn new(points: Vec<(T, T)>) -> Result<Self> {
        if points.len() < MIN_KNOWN_SAMPLES {
            return Err(Error::InsufficientData {
                known: points.len(),
                required: MIN_KNOWN_SAMPLES,
            });
        }

        if let Some(i) = points.windows(2).position(|w| w[1].0 <= w[0].0) {
            return Err(Error::UnsortedInput(i + 1));
        }

        Ok(Self { points })
    }

    /// The points this interpolator passes through.
    #[must_use]
    pub fn points(&self) -> &[(T, T)] {
        &self.points
    }
}

impl<T: Value> Curve<T> for LinearInterpolator<T> {
    fn y(&self, x: T) -> T {
        let (first, last) = (self.points[0], self.points[self.points.len() - 1]);
        if x.is_nan() {
            return x;
        } else if x <= first.0 {
            return first.1;
        } else if x >= last.0 {
            return last.1;
        }

        // First point strictly right of x; always in 1..len here
        let hi = self.points.partition_point(|(px, _)| *px <= x);
        let (x0, y0) = self.points[hi - 1];
        let (x1, y1) = self.points[hi];

        let w = (x - x0) / (x1 - x0);
        y0 + w * (y1 - y0)
    }
}
