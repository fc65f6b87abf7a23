//! Symmetric banded systems with at most two off-diagonals.
//!
//! The smoothing spline only ever has to solve systems of the form `(QᵀQ + pT) u = b`,
//! where both `QᵀQ` and `T` are symmetric with bandwidth 2. Storing the three
//! diagonals and factoring with a banded LDLᵀ keeps every solve at O(n).
use nalgebra::DVector;

use crate::{
    error::{Error, Result},
    value::Value,
};

/// A symmetric matrix with non-zero entries only on the main diagonal and the two above it.
///
/// The lower half is implied by symmetry.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricBand<T: Value> {
    diag: DVector<T>,
    upper1: DVector<T>,
    upper2: DVector<T>,
}

impl<T: Value> SymmetricBand<T> {
    /// Creates an all-zero `n × n` band.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            diag: DVector::zeros(n),
            upper1: DVector::zeros(n.saturating_sub(1)),
            upper2: DVector::zeros(n.saturating_sub(2)),
        }
    }

    /// Size of the (square) matrix.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.diag.len()
    }

    /// Sets `A[i][i]`.
    pub fn set_diag(&mut self, i: usize, value: T) {
        self.diag[i] = value;
    }

    /// Sets `A[i][i+1]` and, by symmetry, `A[i+1][i]`.
    pub fn set_upper1(&mut self, i: usize, value: T) {
        self.upper1[i] = value;
    }

    /// Sets `A[i][i+2]` and, by symmetry, `A[i+2][i]`.
    pub fn set_upper2(&mut self, i: usize, value: T) {
        self.upper2[i] = value;
    }

    /// Returns `self + scale * other`.
    ///
    /// Both bands must have the same dimension.
    #[must_use]
    pub fn scaled_add(&self, other: &Self, scale: T) -> Self {
        let combine = |a: T, b: T| a + b * scale;
        Self {
            diag: self.diag.zip_map(&other.diag, combine),
            upper1: self.upper1.zip_map(&other.upper1, combine),
            upper2: self.upper2.zip_map(&other.upper2, combine),
        }
    }

    /// Computes `A x`.
    #[must_use]
    pub fn mul_vector(&self, x: &DVector<T>) -> DVector<T> {
        let n = self.dim();
        let mut out = DVector::zeros(n);
        for i in 0..n {
            let mut v = self.diag[i] * x[i];
            if i + 1 < n {
                v = v + self.upper1[i] * x[i + 1];
            }
            if i + 2 < n {
                v = v + self.upper2[i] * x[i + 2];
            }
            if i >= 1 {
                v = v + self.upper1[i - 1] * x[i - 1];
            }
            if i >= 2 {
                v = v + self.upper2[i - 2] * x[i - 2];
            }
            out[i] = v;
        }
        out
    }

    /// Factors the matrix as `L D Lᵀ`, with `L` unit lower-triangular of bandwidth 2.
    ///
    /// # Errors
    /// Returns [`Error::Algebra`] if the matrix is not positive definite, or if the
    /// factorization produces a non-finite pivot.
    pub fn factor(&self) -> Result<BandLdlt<T>> {
        let n = self.dim();
        let mut d = DVector::<T>::zeros(n);
        let mut l1 = DVector::<T>::zeros(n);
        let mut l2 = DVector::<T>::zeros(n);

        for j in 0..n {
            let mut pivot = self.diag[j];

            if j >= 2 {
                l2[j] = self.upper2[j - 2] / d[j - 2];
                pivot = pivot - l2[j] * l2[j] * d[j - 2];
            }

            if j >= 1 {
                let mut e = self.upper1[j - 1];
                if j >= 2 {
                    e = e - l2[j] * l1[j - 1] * d[j - 2];
                }
                l1[j] = e / d[j - 1];
                pivot = pivot - l1[j] * l1[j] * d[j - 1];
            }

            if !pivot.is_finite_value() || pivot <= T::zero() {
                return Err(Error::Algebra("banded system is not positive definite"));
            }
            d[j] = pivot;
        }

        Ok(BandLdlt { d, l1, l2 })
    }
}

/// LDLᵀ factorization of a [`SymmetricBand`].
#[derive(Debug, Clone)]
pub struct BandLdlt<T: Value> {
    d: DVector<T>,
    l1: DVector<T>,
    l2: DVector<T>,
}

impl<T: Value> BandLdlt<T> {
    /// Solves `A x = b` for `x`.
    #[must_use]
    pub fn solve(&self, b: &DVector<T>) -> DVector<T> {
        let n = self.d.len();
        let mut x = b.clone();

        // L z = b
        for j in 1..n {
            x[j] = x[j] - self.l1[j] * x[j - 1];
            if j >= 2 {
                x[j] = x[j] - self.l2[j] * x[j - 2];
            }
        }

        for j in 0..n {
            x[j] = x[j] / self.d[j];
        }

        // Lᵀ x = z
        for j in (0..n).rev() {
            if j + 1 < n {
                x[j] = x[j] - self.l1[j + 1] * x[j + 1];
            }
            if j + 2 < n {
                x[j] = x[j] - self.l2[j + 2] * x[j + 2];
            }
        }

        x
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{DMatrix, DVector};

    use super::*;
    use crate::assert_close;

    fn sample_band() -> SymmetricBand<f64> {
        let mut band = SymmetricBand::zeros(5);
        for i in 0..5 {
            band.set_diag(i, 6.0 + i as f64);
        }
        for i in 0..4 {
            band.set_upper1(i, -2.0 + 0.5 * i as f64);
        }
        for i in 0..3 {
            band.set_upper2(i, 0.75);
        }
        band
    }

    fn to_dense(band: &SymmetricBand<f64>) -> DMatrix<f64> {
        let n = band.dim();
        DMatrix::from_fn(n, n, |r, c| {
            let mut e = DVector::zeros(n);
            e[c] = 1.0;
            band.mul_vector(&e)[r]
        })
    }

    #[test]
    fn solves_against_dense() {
        let band = sample_band();
        let b = DVector::from_vec(vec![1.0, -2.0, 3.0, 0.5, 4.0]);

        let x = band.factor().unwrap().solve(&b);
        let residual = to_dense(&band) * &x - &b;
        for r in residual.iter() {
            assert_close!(*r, 0.0, 1e-12);
        }
    }

    #[test]
    fn product_is_symmetric() {
        let dense = to_dense(&sample_band());
        assert_eq!(dense, dense.transpose());
        assert_eq!(dense[(0, 2)], 0.75);
        assert_eq!(dense[(0, 3)], 0.0);
    }

    #[test]
    fn scaled_add_combines_diagonals() {
        let band = sample_band();
        let sum = band.scaled_add(&band, 2.0);
        let x = DVector::from_vec(vec![1.0, 1.0, 1.0, 1.0, 1.0]);
        let expected = band.mul_vector(&x) * 3.0;
        for (a, b) in sum.mul_vector(&x).iter().zip(expected.iter()) {
            assert_close!(*a, *b, 1e-12);
        }
    }

    #[test]
    fn rejects_indefinite() {
        let mut band = SymmetricBand::<f64>::zeros(2);
        band.set_diag(0, 1.0);
        band.set_diag(1, 1.0);
        band.set_upper1(0, 2.0);
        assert!(matches!(band.factor(), Err(Error::Algebra(_))));
    }
}
