//! Synthetic data for testing and benchmarking gap filling
//!
//! Values can be transformed by anything implementing the [`Transform`] trait, which applies
//! the transformation over a set of values in place.
//!
//! # Noise: [`NoiseTransform`] / [`ApplyNoise`]
//! - Gaussian noise: [`NoiseTransform::Normal`]
//!   - [`ApplyNoise::apply_normal_noise`] applies it to a vector of samples
//! - Uniform noise: [`NoiseTransform::Uniform`]
//!   - [`ApplyNoise::apply_uniform_noise`] applies it to a vector of samples
//!
//! # Gaps: [`PunchGaps`]
//! - [`PunchGaps::punch_gaps`] removes an exact number of distinct samples
//! - [`PunchGaps::punch_gaps_with_probability`] removes each sample independently
//!
//! Every transform takes an optional seed. Without one, the system RNG seeds each run.
//!
//! ```rust
//! use gapfill::transforms::{ApplyNoise, PunchGaps};
//!
//! let truth: Vec<f64> = (0..1000).map(|i| (f64::from(i) * 0.01).sin()).collect();
//! let series = truth.clone().apply_normal_noise(0.01, Some(1)).punch_gaps(100, Some(2));
//! assert_eq!(series.gap_count(), 100);
//! ```
use rand::SeedableRng;

use crate::value::Value;

mod noise;
pub use noise::{ApplyNoise, NoiseTransform};

mod gaps;
pub use gaps::PunchGaps;

pub use rand;
pub use rand_distr;

/// Trait for applying transformations to data.
pub trait Transform<T: Value> {
    /// Applies the transformation to the given data.
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>);
}

/// Trait for transforming data.
pub trait Transformable<T: Value> {
    /// Transforms the data in place.
    fn transform<R: Transform<T>>(&mut self, transform: &R);
}
impl<T: Value> Transformable<T> for Vec<T> {
    fn transform<R: Transform<T>>(&mut self, transform: &R) {
        transform.apply(self.iter_mut());
    }
}

fn rng(seed: Option<u64>) -> rand::rngs::SmallRng {
    match seed {
        Some(s) => rand::rngs::SmallRng::seed_from_u64(s),
        None => rand::rngs::SmallRng::from_rng(&mut rand::rng()),
    }
}
