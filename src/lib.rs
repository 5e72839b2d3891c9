//! # deepq - Temporal-Difference Q-Learning Brain
//!
//! `deepq` provides a reinforcement learning agent that learns to pick one of
//! a fixed set of discrete actions from a stream of observations and scalar
//! rewards. The agent, a [`Brain`](agent::Brain), is driven one step at a
//! time: `forward` with an observation returns an action, `backward` with the
//! reward that action earned records the transition and trains.
//!
//! ## Key Features
//!
//! - **Temporal context**: the value network sees the current observation
//!   together with the last few observations and actions
//! - **Experience replay**: a fixed-capacity memory with random-replacement eviction
//! - **Annealed exploration**: epsilon-greedy with a linear schedule and an
//!   optional bias over random actions
//! - **Pluggable value function**: any [`ValueFunction`](agent::ValueFunction)
//!   works; a dense network with an SGD/Adam trainer is built in
//! - **Reproducible**: all randomness comes from a seedable source owned by the brain
//!
//! ## Quick Start
//!
//! ```rust
//! use deepq::agent::Brain;
//! use deepq::config::BrainOptions;
//! use ndarray::array;
//!
//! let options = BrainOptions {
//!     temporal_window: 2,
//!     hidden_layer_sizes: vec![16],
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let mut brain = Brain::new(3, 2, options).unwrap();
//!
//! let action = brain.forward(array![0.1, 0.2, 0.3].view()).unwrap();
//! brain.backward(if action == 1 { 1.0 } else { 0.0 }).unwrap();
//! println!("{}", brain.status());
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (ReLU, Sigmoid, Tanh, etc.)
//! - [`agent`] - The brain, temporal encoder, exploration policy and value function trait
//! - [`builders`] - Layer layouts and builders for networks and replay buffers
//! - [`config`] - Brain and trainer options
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Regression losses
//! - [`metrics`] - Running averages for diagnostics
//! - [`network`] - Feed-forward network with save/load
//! - [`optimizer`] - SGD and Adam update rules
//! - [`random`] - Seedable random source
//! - [`replay_buffer`] - Experience replay memory
//! - [`trainer`] - Batch-accumulating regression trainer

pub mod activations;
pub mod agent;
pub mod builders;
pub mod config;
pub mod error;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod random;
pub mod replay_buffer;
pub mod trainer;

pub use agent::{Brain, BrainStatus};
pub use config::{BrainOptions, TrainerOptions};
pub use error::{BrainError, Result};

#[cfg(test)]
mod tests;
