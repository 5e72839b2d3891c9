use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Serialize, Deserialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use bincode::{serialize, deserialize};

use crate::error::{BrainError, Result};
use crate::layers::{Layer, LayerTrait};

/// Gradients of one layer: weights then biases
pub type LayerGradients = (Array2<f32>, Array1<f32>);

/// A feed-forward stack of dense layers.
///
/// The last layer's outputs are the network outputs; for a value network
/// that is one Q-value per action.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<Layer>,
}

impl NeuralNetwork {
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(BrainError::InvalidLayerSpec(
                "network must have at least one layer".to_string(),
            ));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(BrainError::dimension_mismatch(
                    format!("layer {} input of {}", i + 1, pair[0].output_size()),
                    format!("{}", pair[1].input_size()),
                ));
            }
        }
        Ok(NeuralNetwork { layers })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.input_size())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.output_size())
    }

    /// Perform a forward pass for a single input vector.
    /// Layer inputs and pre-activations are cached for a following `backward`.
    pub fn forward(&mut self, input: ArrayView1<f32>) -> Array1<f32> {
        let mut current_output = input.insert_axis(Axis(0)).to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_batch(current_output.view());
        }
        current_output.index_axis_move(Axis(0), 0)
    }

    /// Compute the gradients of every layer given the error at the outputs of
    /// the last `forward` call.
    pub fn backward(&self, output_error: ArrayView1<f32>) -> Result<Vec<LayerGradients>> {
        if output_error.len() != self.output_size() {
            return Err(BrainError::dimension_mismatch(
                format!("output error of length {}", self.output_size()),
                format!("{}", output_error.len()),
            ));
        }

        let mut gradients: Vec<LayerGradients> = Vec::with_capacity(self.layers.len());
        let mut current_error = output_error.insert_axis(Axis(0)).to_owned();

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (adjusted_error, weight_gradients, bias_gradients) = layer.backward_batch(current_error.view())?;
            gradients.push((weight_gradients, bias_gradients));

            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        Ok(gradients)
    }

    /// Save the network's weights to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serialize(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(&serialized)?;
        Ok(())
    }

    /// Load a network previously written by [`NeuralNetwork::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = fs::File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        let deserialized: Self = deserialize(&buffer)?;
        Ok(deserialized)
    }
}
