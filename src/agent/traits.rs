use ndarray::{Array1, ArrayView1};
use serde::{Serialize, Deserialize};

use super::exploration::Policy;
use crate::config::TrainerOptions;
use crate::error::{BrainError, Result};
use crate::network::NeuralNetwork;
use crate::trainer::Trainer;

/// Action-value function approximator driven by a [`Brain`](super::Brain).
///
/// The brain only ever asks for the Q-values of an encoded input and for a
/// regression step of one output toward a target.
pub trait ValueFunction {
    /// Length of the encoded input vector
    fn input_size(&self) -> usize;

    /// Number of outputs, one per action
    fn output_size(&self) -> usize;

    /// Q-values for every action
    fn forward(&mut self, input: ArrayView1<f32>) -> Array1<f32>;

    /// Regress output `action` toward `target` and return the loss
    fn train_step(&mut self, input: ArrayView1<f32>, action: usize, target: f32) -> Result<f32>;

    /// Number of replayed experiences trained on per learning step
    fn batch_size(&self) -> usize;

    /// Value of the greedy action for `input`, picked by the same rule as
    /// action selection
    fn max_value(&mut self, input: ArrayView1<f32>) -> f32 {
        Policy::greedy(self.forward(input).view()).map_or(f32::NEG_INFINITY, |policy| policy.value)
    }
}

/// Default value function: a dense network with its trainer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QNetwork {
    pub network: NeuralNetwork,
    trainer: Trainer,
}

impl QNetwork {
    pub fn new(network: NeuralNetwork, options: TrainerOptions) -> Result<Self> {
        let trainer = Trainer::new(options, &network)?;
        Ok(QNetwork { network, trainer })
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }
}

impl ValueFunction for QNetwork {
    fn input_size(&self) -> usize {
        self.network.input_size()
    }

    fn output_size(&self) -> usize {
        self.network.output_size()
    }

    fn forward(&mut self, input: ArrayView1<f32>) -> Array1<f32> {
        self.network.forward(input)
    }

    fn train_step(&mut self, input: ArrayView1<f32>, action: usize, target: f32) -> Result<f32> {
        if !target.is_finite() {
            return Err(BrainError::NumericalError(format!(
                "non-finite TD target {} for action {}",
                target, action
            )));
        }
        let loss = self.trainer.train(&mut self.network, input, action, target)?;
        Ok(loss.loss)
    }

    fn batch_size(&self) -> usize {
        self.trainer.batch_size()
    }
}
