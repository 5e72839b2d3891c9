//! # Configuration
//!
//! Every option the brain recognizes lives in [`BrainOptions`], with the
//! trainer's options nested in [`TrainerOptions`]. Both deserialize with
//! missing fields falling back to their defaults, so a JSON file only needs to
//! name what it changes:
//!
//! ```rust
//! use deepq::config::BrainOptions;
//!
//! let options = BrainOptions::from_json(r#"{ "temporal_window": 3, "gamma": 0.9 }"#).unwrap();
//! assert_eq!(options.temporal_window, 3);
//! assert_eq!(options.experience_size, 30000);
//! ```
//!
//! Options are validated once, when the brain is built.

use serde::{Deserialize, Serialize};

use crate::builders::network::LayerSpec;
use crate::error::{BrainError, Result};
use crate::loss::LossKind;

/// Tolerance on the sum of `random_action_distribution`.
pub const DISTRIBUTION_TOLERANCE: f32 = 1e-4;

/// Parameter update rule applied by the trainer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrainerMethod {
    /// Stochastic gradient descent, with momentum when `momentum > 0`
    #[default]
    Sgd,
    Adam {
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
}

/// Options owned by the value network's trainer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerOptions {
    pub learning_rate: f32,
    pub momentum: f32,
    /// Number of `train` calls accumulated before the parameters are updated.
    pub batch_size: usize,
    pub l1_decay: f32,
    pub l2_decay: f32,
    pub method: TrainerMethod,
    pub loss: LossKind,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        TrainerOptions {
            learning_rate: 0.01,
            momentum: 0.0,
            batch_size: 64,
            l1_decay: 0.0,
            l2_decay: 0.01,
            method: TrainerMethod::Sgd,
            loss: LossKind::Squared,
        }
    }
}

impl TrainerOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(BrainError::invalid_parameter(
                "learning_rate",
                "must be a positive finite number",
            ));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(BrainError::invalid_parameter("momentum", "must be in [0, 1)"));
        }
        if self.batch_size == 0 {
            return Err(BrainError::invalid_parameter("batch_size", "must be greater than 0"));
        }
        if self.l1_decay < 0.0 || self.l2_decay < 0.0 {
            return Err(BrainError::invalid_parameter("decay", "L1/L2 decay must be non-negative"));
        }
        if let TrainerMethod::Adam { beta1, beta2, epsilon } = self.method {
            if !(0.0..1.0).contains(&beta1) || !(0.0..1.0).contains(&beta2) || epsilon <= 0.0 {
                return Err(BrainError::invalid_parameter(
                    "method",
                    "adam needs beta1, beta2 in [0, 1) and a positive epsilon",
                ));
            }
        }
        if let LossKind::Huber { delta } = self.loss {
            if delta <= 0.0 {
                return Err(BrainError::invalid_parameter("loss", "huber delta must be positive"));
            }
        }
        Ok(())
    }
}

/// Hyperparameters of a [`Brain`](crate::agent::Brain).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainOptions {
    /// Number of past (state, action) pairs fed to the network next to the current state.
    pub temporal_window: usize,
    /// Capacity of the experience replay memory.
    pub experience_size: usize,
    /// Experiences required in memory before learning begins.
    pub start_learn_threshold: usize,
    /// Discount factor, in `[0, 1]`.
    pub gamma: f32,
    pub learning_steps_total: usize,
    /// Steps at the start during which epsilon stays at 1.
    pub learning_steps_burnin: usize,
    pub epsilon_min: f32,
    /// Epsilon used while learning is disabled.
    pub epsilon_test_time: f32,
    /// Bias for random actions. Empty means uniform.
    pub random_action_distribution: Vec<f32>,
    /// Full value network layout. When absent, one is built from `hidden_layer_sizes`.
    pub layer_specs: Option<Vec<LayerSpec>>,
    pub hidden_layer_sizes: Vec<usize>,
    pub trainer: TrainerOptions,
    /// Seed for the brain's random source and weight initialization.
    pub seed: Option<u64>,
}

impl Default for BrainOptions {
    fn default() -> Self {
        BrainOptions {
            temporal_window: 1,
            experience_size: 30000,
            start_learn_threshold: 1000,
            gamma: 0.8,
            learning_steps_total: 100000,
            learning_steps_burnin: 3000,
            epsilon_min: 0.05,
            epsilon_test_time: 0.01,
            random_action_distribution: Vec::new(),
            layer_specs: None,
            hidden_layer_sizes: Vec::new(),
            trainer: TrainerOptions::default(),
            seed: None,
        }
    }
}

impl BrainOptions {
    /// Defaults with the given replay capacity. The learn threshold becomes
    /// `min(0.1 * experience_size, 1000)`.
    pub fn with_experience_size(experience_size: usize) -> Self {
        BrainOptions {
            experience_size,
            start_learn_threshold: (experience_size / 10).min(1000),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Length of the sliding windows. Never less than 2.
    pub fn window_size(&self) -> usize {
        self.temporal_window.max(2)
    }

    /// Length of the encoded network input for the given problem size.
    pub fn net_inputs(&self, num_states: usize, num_actions: usize) -> usize {
        num_states * self.temporal_window + num_actions * self.temporal_window + num_states
    }

    /// Check every option against the problem size.
    pub fn validate(&self, num_states: usize, num_actions: usize) -> Result<()> {
        if num_states == 0 {
            return Err(BrainError::invalid_parameter("num_states", "must be greater than 0"));
        }
        if num_actions == 0 {
            return Err(BrainError::invalid_parameter("num_actions", "must be greater than 0"));
        }
        if self.experience_size == 0 {
            return Err(BrainError::invalid_parameter("experience_size", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(BrainError::invalid_parameter("gamma", "must be in [0, 1]"));
        }
        if self.learning_steps_total <= self.learning_steps_burnin {
            return Err(BrainError::invalid_parameter(
                "learning_steps_total",
                "must be greater than learning_steps_burnin",
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon_min) {
            return Err(BrainError::invalid_parameter("epsilon_min", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.epsilon_test_time) {
            return Err(BrainError::invalid_parameter("epsilon_test_time", "must be in [0, 1]"));
        }
        if !self.random_action_distribution.is_empty() {
            if self.random_action_distribution.len() != num_actions {
                return Err(BrainError::dimension_mismatch(
                    format!("random_action_distribution of length {}", num_actions),
                    format!("length {}", self.random_action_distribution.len()),
                ));
            }
            if self.random_action_distribution.iter().any(|&p| p.is_nan() || p < 0.0) {
                return Err(BrainError::invalid_parameter(
                    "random_action_distribution",
                    "probabilities must be non-negative",
                ));
            }
            let sum: f32 = self.random_action_distribution.iter().sum();
            if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
                return Err(BrainError::InvalidParameter {
                    name: "random_action_distribution".to_string(),
                    reason: format!("must sum to 1, sums to {}", sum),
                });
            }
        }
        if self.hidden_layer_sizes.iter().any(|&size| size == 0) {
            return Err(BrainError::invalid_parameter(
                "hidden_layer_sizes",
                "hidden layers need at least one neuron",
            ));
        }
        self.trainer.validate()
    }
}
