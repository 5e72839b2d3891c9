//! # Loss Functions Module
//!
//! The value network is trained as a regressor on one output at a time: the
//! output for the action that was taken is pulled toward its TD target and
//! every other output is left unsupervised. The losses here therefore work on
//! a single dimension of the prediction.

pub mod functions;

pub use functions::{HuberLoss, Loss, LossKind, SquaredError};
