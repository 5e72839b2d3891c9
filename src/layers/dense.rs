use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::activations::Activation;
use crate::error::{BrainError, Result};
use super::initialization::WeightInit;
use super::traits::Layer as LayerTrait;

/// A fully connected (dense) layer in a neural network
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    pre_activation_output: Option<Array2<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
}

impl DenseLayer {
    /// Create a new dense layer with the given input size, output size, and activation function.
    /// Weights are drawn from `init` using `rng`; biases start at the
    /// activation's initial bias.
    pub fn new_using<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Self {
        let weights = init.initialize_weights((input_size, output_size), rng);
        let biases = Array1::from_elem(output_size, activation.initial_bias());
        DenseLayer {
            weights,
            biases,
            activation,
            pre_activation_output: None,
            inputs: None,
        }
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Result<Self> {
        if weights.dim() != self.weights.dim() {
            return Err(BrainError::dimension_mismatch(
                format!("{:?}", self.weights.dim()),
                format!("{:?}", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Result<Self> {
        if biases.dim() != self.biases.dim() {
            return Err(BrainError::dimension_mismatch(
                format!("{}", self.biases.len()),
                format!("{}", biases.len()),
            ));
        }
        self.biases = biases;
        Ok(self)
    }
}

impl LayerTrait for DenseLayer {
    fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        self.inputs = Some(inputs.to_owned());
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        self.pre_activation_output = Some(outputs.clone());
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    fn backward_batch(&self, output_errors: ArrayView2<f32>) -> Result<(Array2<f32>, Array2<f32>, Array1<f32>)> {
        let (pre_activation_output, inputs) = match (&self.pre_activation_output, &self.inputs) {
            (Some(pre), Some(inputs)) => (pre, inputs),
            _ => {
                return Err(BrainError::TrainingError(
                    "forward_batch() must be called before backward_batch()".to_string(),
                ))
            }
        };

        let activation_deriv = self.activation.derivative_batch(pre_activation_output.view());
        let adjusted_error = output_errors.to_owned() * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));

        Ok((adjusted_error, weight_gradients, bias_gradients))
    }

    fn weights_mut(&mut self) -> &mut Array2<f32> {
        &mut self.weights
    }

    fn biases_mut(&mut self) -> &mut Array1<f32> {
        &mut self.biases
    }

    fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }

    fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }
}

/// Shorter alias used throughout the network code
pub type Layer = DenseLayer;

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layer(input: usize, output: usize, activation: Activation) -> DenseLayer {
        DenseLayer::new_using(input, output, activation, WeightInit::ScaledNormal, &mut StdRng::seed_from_u64(5))
    }

    #[test]
    fn test_relu_layer_starts_with_positive_bias() {
        let relu = layer(3, 4, Activation::Relu);
        assert!(relu.biases.iter().all(|&b| b == 0.1));
        let linear = layer(3, 4, Activation::Linear);
        assert!(linear.biases.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_forward_known_weights() {
        let mut dense = layer(2, 2, Activation::Linear)
            .with_weights(array![[1.0, 2.0], [3.0, 4.0]])
            .unwrap()
            .with_biases(array![0.5, -0.5])
            .unwrap();
        let out = dense.forward_batch(array![[1.0, 1.0]].view());
        assert_eq!(out, array![[4.5, 5.5]]);
    }

    #[test]
    fn test_backward_requires_forward() {
        let dense = layer(2, 2, Activation::Linear);
        assert!(dense.backward_batch(array![[1.0, 0.0]].view()).is_err());
    }

    #[test]
    fn test_backward_gradients() {
        let mut dense = layer(2, 1, Activation::Linear)
            .with_weights(array![[1.0], [1.0]])
            .unwrap();
        dense.forward_batch(array![[2.0, 3.0]].view());
        let (_, wg, bg) = dense.backward_batch(array![[1.0]].view()).unwrap();
        assert_eq!(wg, array![[2.0], [3.0]]);
        assert_eq!(bg, array![1.0]);
    }

    #[test]
    fn test_with_weights_shape_check() {
        assert!(layer(2, 2, Activation::Linear).with_weights(array![[1.0, 2.0]]).is_err());
    }
}
