use ndarray::ArrayView1;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::BrainOptions;
use crate::random::{weighted_sample, RandomSource};

/// Linearly annealed exploration rate.
///
/// Epsilon is 1 for the first `burnin` steps, then falls linearly to
/// `epsilon_min` at step `total` and stays there.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    pub learning_steps_total: usize,
    pub learning_steps_burnin: usize,
    pub epsilon_min: f32,
    pub epsilon_test_time: f32,
}

impl EpsilonSchedule {
    pub fn from_options(options: &BrainOptions) -> Self {
        EpsilonSchedule {
            learning_steps_total: options.learning_steps_total,
            learning_steps_burnin: options.learning_steps_burnin,
            epsilon_min: options.epsilon_min,
            epsilon_test_time: options.epsilon_test_time,
        }
    }

    /// Exploration rate at `age`. Outside learning the fixed test-time rate applies.
    pub fn epsilon(&self, age: usize, learning: bool) -> f32 {
        if !learning {
            return self.epsilon_test_time;
        }
        let progress = (age as f32 - self.learning_steps_burnin as f32)
            / (self.learning_steps_total as f32 - self.learning_steps_burnin as f32);
        (1.0 - progress).clamp(self.epsilon_min, 1.0)
    }
}

/// Greedy choice over a vector of action values
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub action: usize,
    pub value: f32,
}

impl Policy {
    /// Index and value of the largest entry; ties go to the lowest index.
    pub fn greedy(values: ArrayView1<f32>) -> Option<Policy> {
        let mut best: Option<Policy> = None;
        for (action, &value) in values.iter().enumerate() {
            match best {
                Some(ref current) if !(value > current.value) => {}
                _ => best = Some(Policy { action, value }),
            }
        }
        best
    }
}

/// Epsilon-greedy action selection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorationPolicy {
    schedule: EpsilonSchedule,
    num_actions: usize,
    /// Empty means uniform
    distribution: Vec<f32>,
}

impl ExplorationPolicy {
    pub fn new(options: &BrainOptions, num_actions: usize) -> Self {
        ExplorationPolicy {
            schedule: EpsilonSchedule::from_options(options),
            num_actions,
            distribution: options.random_action_distribution.clone(),
        }
    }

    pub fn schedule(&self) -> &EpsilonSchedule {
        &self.schedule
    }

    pub fn epsilon(&self, age: usize, learning: bool) -> f32 {
        self.schedule.epsilon(age, learning)
    }

    /// True when a draw should be replaced by a random action
    pub fn explore<R: RandomSource + ?Sized>(&self, epsilon: f32, rng: &mut R) -> bool {
        rng.uniform() < epsilon
    }

    /// Pick a random action, uniformly or from the configured distribution.
    pub fn random_action<R: RandomSource + ?Sized>(&self, rng: &mut R) -> usize {
        if self.distribution.is_empty() {
            return rng.index(self.num_actions);
        }
        let p = rng.uniform();
        match weighted_sample(&self.distribution, p) {
            Some(action) => action,
            None => {
                let fallback = self.num_actions - 1;
                debug!(draw = p, fallback, "weighted action sampling selected nothing, using last action");
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use ndarray::array;

    fn schedule() -> EpsilonSchedule {
        EpsilonSchedule {
            learning_steps_total: 1100,
            learning_steps_burnin: 100,
            epsilon_min: 0.1,
            epsilon_test_time: 0.02,
        }
    }

    #[test]
    fn test_epsilon_schedule() {
        let s = schedule();
        assert_eq!(s.epsilon(0, true), 1.0);
        assert_eq!(s.epsilon(100, true), 1.0);
        assert!((s.epsilon(600, true) - 0.5).abs() < 1e-6);
        assert_eq!(s.epsilon(1100, true), 0.1);
        assert_eq!(s.epsilon(1_000_000, true), 0.1);
        assert_eq!(s.epsilon(600, false), 0.02);
    }

    #[test]
    fn test_greedy_ties_go_to_lowest_index() {
        let policy = Policy::greedy(array![0.1, 0.9, 0.3].view()).unwrap();
        assert_eq!(policy.action, 1);
        assert_eq!(policy.value, 0.9);

        let tie = Policy::greedy(array![0.5, 0.7, 0.7].view()).unwrap();
        assert_eq!(tie.action, 1);

        assert!(Policy::greedy(ndarray::Array1::<f32>::zeros(0).view()).is_none());
    }

    #[test]
    fn test_uniform_random_action_in_range() {
        let policy = ExplorationPolicy::new(&BrainOptions::default(), 4);
        let mut rng = SeededRandom::new(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[policy.random_action(&mut rng)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_weighted_random_action_follows_distribution() {
        let options = BrainOptions {
            random_action_distribution: vec![0.0, 1.0, 0.0],
            ..Default::default()
        };
        let policy = ExplorationPolicy::new(&options, 3);
        let mut rng = SeededRandom::new(3);
        for _ in 0..50 {
            assert_eq!(policy.random_action(&mut rng), 1);
        }
    }
}
