//! # Agent Module
//!
//! The [`Brain`] and the pieces it is assembled from.
//!
//! ## Core Concepts
//!
//! - **Temporal window**: the network sees the current observation plus the
//!   last few (observation, action) pairs, encoded by [`TemporalEncoder`]
//! - **Exploration**: epsilon-greedy action choice with epsilon annealed
//!   linearly over the learning steps ([`ExplorationPolicy`])
//! - **Experience replay**: transitions are stored in a fixed-capacity
//!   [`ReplayBuffer`](crate::replay_buffer::ReplayBuffer) and replayed in
//!   random batches
//! - **TD target**: each replayed transition is regressed toward
//!   `reward + gamma * max_a Q(next, a)`
//!
//! ## Value functions
//!
//! The brain talks to its approximator only through [`ValueFunction`].
//! [`QNetwork`] is the default, a dense network with an SGD trainer.

pub mod brain;
pub mod encoder;
pub mod exploration;
pub mod traits;
pub mod window;

pub use brain::{Brain, BrainStatus};
pub use encoder::TemporalEncoder;
pub use exploration::{EpsilonSchedule, ExplorationPolicy, Policy};
pub use traits::{QNetwork, ValueFunction};
pub use window::SlidingWindow;
