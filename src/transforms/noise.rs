use rand_distr::{Distribution, Normal, Uniform};

use crate::{
    transforms::{rng, Transform},
    value::Value,
};

/// Types of noise based transforms for data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseTransform<T: Value> {
    /// Adds independent Gaussian noise to every value.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// xₙ = x + εₙ
    /// where
    ///   εₙ ~ N(0, strength²), x = uncorrupted value
    /// ```
    /// </div>
    Normal {
        /// Standard deviation of the noise.
        strength: T,

        /// Fixes the RNG seed for reproducibility.
        /// If not provided, a system RNG will be used each run.
        seed: Option<u64>,
    },

    /// Adds noise drawn uniformly from `[-strength, strength)` to every value.
    Uniform {
        /// Half-width of the noise interval.
        strength: T,

        /// Fixes the RNG seed for reproducibility.
        /// If not provided, a system RNG will be used each run.
        seed: Option<u64>,
    },
}
impl<T: Value> NoiseTransform<T> {
    fn seed(&self) -> Option<u64> {
        match self {
            NoiseTransform::Normal { seed, .. } | NoiseTransform::Uniform { seed, .. } => *seed,
        }
    }
}
impl<T: Value> Transform<T> for NoiseTransform<T>
where
    T: num_traits::Float + rand_distr::uniform::SampleUniform,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
{
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>) {
        let mut rng = rng(self.seed());
        match self {
            NoiseTransform::Normal { strength, .. } => {
                let mut strength = num_traits::Float::abs(*strength);
                if !num_traits::Float::is_finite(strength) {
                    strength = T::zero();
                }

                let Ok(gaussian) = Normal::new(T::zero(), strength) else {
                    tracing::warn!("could not build a normal distribution; data left unchanged");
                    return;
                };
                data.for_each(|v| *v += gaussian.sample(&mut rng));
            }

            NoiseTransform::Uniform { strength, .. } => {
                let strength = num_traits::Float::abs(*strength);
                let strength =
                    num_traits::Float::max(strength, <T as num_traits::Float>::epsilon());

                let Ok(uniform) = Uniform::new(-strength, strength) else {
                    tracing::warn!("could not build a uniform distribution; data left unchanged");
                    return;
                };
                data.for_each(|v| *v += uniform.sample(&mut rng));
            }
        }
    }
}

/// Trait for applying noise to data.
pub trait ApplyNoise<T: Value>
where
    Self: Sized,
{
    /// Adds Gaussian noise to every value.
    ///
    /// # Parameters
    ///
    /// - `strength`: Standard deviation of the noise. Non-finite strengths add no noise.
    /// - `seed` *(optional)*: Fixes the RNG seed for reproducibility.
    ///   If not provided, a system RNG will be used each run.
    ///
    /// # Example
    /// ```rust
    /// # use gapfill::transforms::ApplyNoise;
    /// let data = vec![2.0, 3.0];
    /// let noisy_data = data.apply_normal_noise(0.1, None);
    /// ```
    #[must_use]
    fn apply_normal_noise(self, strength: T, seed: Option<u64>) -> Self;

    /// Adds noise drawn uniformly from `[-strength, strength)` to every value.
    ///
    /// # Parameters
    ///
    /// - `strength`: Half-width of the noise interval.
    /// - `seed` *(optional)*: Fixes the RNG seed for reproducibility.
    ///   If not provided, a system RNG will be used each run.
    ///
    /// # Example
    /// ```rust
    /// # use gapfill::transforms::ApplyNoise;
    /// let data = vec![2.0, 3.0];
    /// let noisy_data = data.apply_uniform_noise(0.1, Some(7));
    /// assert!(noisy_data.iter().all(|v| (2.0 - 0.1..3.0 + 0.1).contains(v)));
    /// ```
    #[must_use]
    fn apply_uniform_noise(self, strength: T, seed: Option<u64>) -> Self;
}
impl<T: Value> ApplyNoise<T> for Vec<T>
where
    T: num_traits::Float + rand_distr::uniform::SampleUniform,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
{
    fn apply_normal_noise(mut self, strength: T, seed: Option<u64>) -> Self {
        NoiseTransform::Normal { strength, seed }.apply(self.iter_mut());
        self
    }

    fn apply_uniform_noise(mut self, strength: T, seed: Option<u64>) -> Self {
        NoiseTransform::Uniform { strength, seed }.apply(self.iter_mut());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{statistics::stddev_and_mean, transforms::Transformable};

    fn noise_of(data: &[f64], noisy: &[f64]) -> (f64, f64) {
        stddev_and_mean(data.iter().zip(noisy).map(|(a, b)| b - a))
    }

    #[test]
    fn normal_noise_has_requested_spread() {
        let data = vec![2.0; 1000];
        let noisy = data.clone().apply_normal_noise(0.1, Some(42));

        let (std_dev, mean) = noise_of(&data, &noisy);
        assert!(mean.abs() < 0.02);
        assert!((std_dev - 0.1).abs() < 0.02);
    }

    #[test]
    fn uniform_noise_stays_in_band() {
        let data = vec![2.0; 1000];
        let noisy = data.clone().apply_uniform_noise(0.1, Some(42));

        assert!(noisy.iter().all(|v| (v - 2.0).abs() <= 0.1 + 1e-12));
        let (std_dev, mean) = noise_of(&data, &noisy);
        assert!(mean.abs() < 0.02);
        assert!((std_dev - 0.1 / 3.0f64.sqrt()).abs() < 0.02);
    }

    #[test]
    fn seed_makes_noise_repeatable() {
        let data: Vec<f64> = (0..50).map(f64::from).collect();
        let a = data.clone().apply_normal_noise(0.5, Some(3));
        let b = data.clone().apply_normal_noise(0.5, Some(3));
        let c = data.apply_normal_noise(0.5, Some(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn degenerate_strength() {
        let data = vec![1.0, 2.0, 3.0];
        assert_eq!(data.clone().apply_normal_noise(f64::NAN, Some(1)), data);
        assert_eq!(data.clone().apply_normal_noise(0.0, Some(1)), data);

        let mut transformed = data.clone();
        transformed.transform(&NoiseTransform::Uniform {
            strength: -0.5,
            seed: Some(9),
        });
        assert!(transformed
            .iter()
            .zip(&data)
            .all(|(a, b)| (a - b).abs() <= 0.5 + 1e-12));
    }
}
