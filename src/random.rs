//! # Random Sources
//!
//! Every random draw made by a [`Brain`](crate::agent::Brain) and its replay
//! buffer goes through a [`RandomSource`] owned by the brain. There is no
//! process-wide generator: two brains seeded identically make identical draws.
//!
//! [`SeededRandom`] is the default source, backed by `StdRng`. Tests can plug
//! in their own implementation to script the exact sequence of draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Source of the uniform and gaussian draws used by the agent.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f32;

    /// Uniform integer in `[0, n)`. `n` must be non-zero.
    fn index(&mut self, n: usize) -> usize;

    /// Draw from a normal distribution with the given mean and standard deviation.
    fn gaussian(&mut self, mean: f32, std: f32) -> f32;

    /// Uniform draw in `[low, high)`.
    fn uniform_range(&mut self, low: f32, high: f32) -> f32 {
        low + self.uniform() * (high - low)
    }
}

/// Seedable random source backed by `StdRng`.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        SeededRandom {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when a seed is given, entropy-initialized otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    /// Access the underlying generator, e.g. for `ndarray-rand` weight initialization.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    fn gaussian(&mut self, mean: f32, std: f32) -> f32 {
        let z: f32 = self.rng.sample(StandardNormal);
        mean + z * std
    }
}

/// Pick an index according to `probs`, given a uniform draw `p` in `[0, 1)`.
///
/// Walks the cumulative distribution and returns the first index whose
/// cumulative probability exceeds `p`. Returns `None` when rounding leaves the
/// cumulative sum at or below `p`.
pub fn weighted_sample(probs: &[f32], p: f32) -> Option<usize> {
    let mut cumprob = 0.0;
    for (k, &prob) in probs.iter().enumerate() {
        cumprob += prob;
        if p < cumprob {
            return Some(k);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.uniform(), b.uniform());
            assert_eq!(a.index(7), b.index(7));
        }
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = SeededRandom::new(1);
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
            let i = rng.index(3);
            assert!(i < 3);
            let r = rng.uniform_range(-2.0, 2.0);
            assert!((-2.0..2.0).contains(&r));
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = SeededRandom::new(3);
        let n = 20_000;
        let samples: Vec<f32> = (0..n).map(|_| rng.gaussian(2.0, 0.5)).collect();
        let mean = samples.iter().sum::<f32>() / n as f32;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n as f32;
        assert!((mean - 2.0).abs() < 0.05);
        assert!((var.sqrt() - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_weighted_sample() {
        let probs = [0.2, 0.5, 0.3];
        assert_eq!(weighted_sample(&probs, 0.0), Some(0));
        assert_eq!(weighted_sample(&probs, 0.19), Some(0));
        assert_eq!(weighted_sample(&probs, 0.2), Some(1));
        assert_eq!(weighted_sample(&probs, 0.69), Some(1));
        assert_eq!(weighted_sample(&probs, 0.99), Some(2));
    }

    #[test]
    fn test_weighted_sample_short_distribution() {
        // sums to 0.9999, so a draw above it selects nothing
        let probs = [0.5, 0.4999];
        assert_eq!(weighted_sample(&probs, 0.99995), None);
    }
}
