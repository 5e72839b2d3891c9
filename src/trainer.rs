//! # Trainer
//!
//! Regression trainer for the value network. Each [`Trainer::train`] call
//! runs one forward and backward pass for a single `(input, dimension,
//! target)` example and adds its gradient to an accumulator. Every
//! `batch_size` calls the accumulated gradient, averaged over the batch and
//! with L1/L2 weight decay folded in, is handed to the optimizer.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::config::TrainerOptions;
use crate::error::{BrainError, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// Losses reported by one `train` call
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainLoss {
    /// Loss on the supervised output dimension
    pub cost_loss: f32,
    /// Weight decay losses, non-zero only on calls that applied an update
    pub l1_decay_loss: f32,
    pub l2_decay_loss: f32,
    /// Sum of the three
    pub loss: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trainer {
    options: TrainerOptions,
    optimizer: OptimizerWrapper,
    weight_gradients: Vec<Array2<f32>>,
    bias_gradients: Vec<Array1<f32>>,
    /// Number of examples seen
    k: usize,
}

impl Trainer {
    pub fn new(options: TrainerOptions, network: &NeuralNetwork) -> Result<Self> {
        options.validate()?;
        let optimizer = OptimizerWrapper::from_method(options.method, options.momentum);
        let weight_gradients = network.layers.iter().map(|layer| Array2::zeros(layer.weights.dim())).collect();
        let bias_gradients = network.layers.iter().map(|layer| Array1::zeros(layer.biases.dim())).collect();
        Ok(Trainer {
            options,
            optimizer,
            weight_gradients,
            bias_gradients,
            k: 0,
        })
    }

    pub fn options(&self) -> &TrainerOptions {
        &self.options
    }

    pub fn batch_size(&self) -> usize {
        self.options.batch_size
    }

    /// Number of examples trained on so far
    pub fn examples_seen(&self) -> usize {
        self.k
    }

    /// Regress output `dim` of `network` toward `target` for `input`.
    pub fn train(
        &mut self,
        network: &mut NeuralNetwork,
        input: ArrayView1<f32>,
        dim: usize,
        target: f32,
    ) -> Result<TrainLoss> {
        if dim >= network.output_size() {
            return Err(BrainError::InvalidAction {
                action: dim,
                max_actions: network.output_size(),
            });
        }
        if input.len() != network.input_size() {
            return Err(BrainError::dimension_mismatch(
                format!("input of length {}", network.input_size()),
                format!("{}", input.len()),
            ));
        }
        if self.weight_gradients.len() != network.layers.len() {
            return Err(BrainError::TrainingError(
                "trainer was built for a different network".to_string(),
            ));
        }

        let prediction = network.forward(input);
        let cost_loss = self.options.loss.compute(prediction.view(), dim, target);
        let output_error = self.options.loss.gradient(prediction.view(), dim, target);
        let gradients = network.backward(output_error.view())?;

        // a rejected example must not reach the accumulator
        let gradients_finite = gradients.iter().all(|(weights, biases)| {
            weights.iter().all(|g| g.is_finite()) && biases.iter().all(|g| g.is_finite())
        });
        if !cost_loss.is_finite() || !gradients_finite {
            return Err(BrainError::NumericalError(format!(
                "non-finite training loss {} for target {}",
                cost_loss, target
            )));
        }

        for (i, (weight_gradients, bias_gradients)) in gradients.into_iter().enumerate() {
            self.weight_gradients[i] += &weight_gradients;
            self.bias_gradients[i] += &bias_gradients;
        }

        self.k += 1;
        let mut l1_decay_loss = 0.0;
        let mut l2_decay_loss = 0.0;
        if self.k % self.options.batch_size == 0 {
            let (l1, l2) = self.apply(network);
            l1_decay_loss = l1;
            l2_decay_loss = l2;
        }

        let loss = TrainLoss {
            cost_loss,
            l1_decay_loss,
            l2_decay_loss,
            loss: cost_loss + l1_decay_loss + l2_decay_loss,
        };
        if !loss.loss.is_finite() {
            return Err(BrainError::NumericalError(format!(
                "non-finite training loss {} for target {}",
                loss.loss, target
            )));
        }
        Ok(loss)
    }

    /// Apply the accumulated gradients and reset them. Returns the L1 and L2
    /// decay losses of the weights before the update.
    fn apply(&mut self, network: &mut NeuralNetwork) -> (f32, f32) {
        let batch = self.options.batch_size as f32;
        let learning_rate = self.options.learning_rate;
        let l1_decay = self.options.l1_decay;
        let l2_decay = self.options.l2_decay;
        let mut l1_decay_loss = 0.0;
        let mut l2_decay_loss = 0.0;

        self.optimizer.begin_step();
        for (i, layer) in network.layers.iter_mut().enumerate() {
            l1_decay_loss += l1_decay * layer.weights.mapv(f32::abs).sum();
            l2_decay_loss += 0.5 * l2_decay * layer.weights.mapv(|w| w * w).sum();

            let mut weight_step = self.weight_gradients[i].clone();
            weight_step.zip_mut_with(&layer.weights, |g, &w| {
                *g = (*g + l2_decay * w + l1_decay * w.signum()) / batch;
            });
            let bias_step = &self.bias_gradients[i] / batch;

            self.optimizer.update_weights(i, &mut layer.weights, &weight_step, learning_rate);
            self.optimizer.update_biases(i, &mut layer.biases, &bias_step, learning_rate);

            self.weight_gradients[i].fill(0.0);
            self.bias_gradients[i].fill(0.0);
        }

        trace!(examples = self.k, l1_decay_loss, l2_decay_loss, "applied parameter update");
        (l1_decay_loss, l2_decay_loss)
    }
}
