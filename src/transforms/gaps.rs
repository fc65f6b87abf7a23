use rand_distr::{Bernoulli, Distribution};

use crate::{series::Series, transforms::rng, value::Value};

/// Trait for turning complete data into a [`Series`] with random gaps.
pub trait PunchGaps<T: Value> {
    /// Removes exactly `count` distinct samples, chosen uniformly at random.
    ///
    /// A `count` larger than the data removes every sample.
    ///
    /// # Parameters
    ///
    /// - `count`: Number of samples to turn into gaps.
    /// - `seed` *(optional)*: Fixes the RNG seed for reproducibility.
    ///   If not provided, a system RNG will be used each run.
    ///
    /// # Example
    /// ```rust
    /// # use gapfill::transforms::PunchGaps;
    /// let data: Vec<f64> = (0..10).map(f64::from).collect();
    /// let series = data.punch_gaps(3, Some(11));
    /// assert_eq!(series.gap_count(), 3);
    /// ```
    #[must_use]
    fn punch_gaps(&self, count: usize, seed: Option<u64>) -> Series<T>;

    /// Removes each sample independently with probability `p`.
    ///
    /// `p` is clamped to `[0, 1]`. A NaN probability removes nothing.
    #[must_use]
    fn punch_gaps_with_probability(&self, p: f64, seed: Option<u64>) -> Series<T>;
}

impl<T: Value> PunchGaps<T> for Vec<T> {
    fn punch_gaps(&self, count: usize, seed: Option<u64>) -> Series<T> {
        let mut samples: Vec<Option<T>> = self.iter().copied().map(Some).collect();

        let count = count.min(samples.len());
        let mut rng = rng(seed);
        for index in rand::seq::index::sample(&mut rng, samples.len(), count) {
            samples[index] = None;
        }

        Series::new(samples)
    }

    fn punch_gaps_with_probability(&self, p: f64, seed: Option<u64>) -> Series<T> {
        let Ok(flip) = Bernoulli::new(p.clamp(0.0, 1.0)) else {
            tracing::warn!(p, "invalid gap probability; no gaps punched");
            return Series::complete(self.iter().copied());
        };

        let mut rng = rng(seed);
        self.iter()
            .map(|&v| if flip.sample(&mut rng) { None } else { Some(v) })
            .collect()
    }
}
