use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::network::NeuralNetwork;
use crate::activations::Activation;
use crate::layers::{Layer, WeightInit};
use crate::error::{Result, BrainError};

/// One entry of a value network layout.
///
/// A layout starts with exactly one `Input`, ends with exactly one
/// `Regression`, and has any number of `FullyConnected` layers between them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Input {
        out_sx: usize,
        out_sy: usize,
        out_depth: usize,
    },
    FullyConnected {
        num_neurons: usize,
        #[serde(default)]
        activation: Activation,
    },
    /// Linear output layer, one neuron per action
    Regression { num_neurons: usize },
}

impl LayerSpec {
    /// A flat `1 x 1 x depth` input volume
    pub fn input(depth: usize) -> Self {
        LayerSpec::Input {
            out_sx: 1,
            out_sy: 1,
            out_depth: depth,
        }
    }

    pub fn fully_connected(num_neurons: usize, activation: Activation) -> Self {
        LayerSpec::FullyConnected { num_neurons, activation }
    }

    pub fn regression(num_neurons: usize) -> Self {
        LayerSpec::Regression { num_neurons }
    }

    /// Number of values this layer outputs
    pub fn size(&self) -> usize {
        match *self {
            LayerSpec::Input { out_sx, out_sy, out_depth } => out_sx * out_sy * out_depth,
            LayerSpec::FullyConnected { num_neurons, .. } => num_neurons,
            LayerSpec::Regression { num_neurons } => num_neurons,
        }
    }
}

/// Input, one ReLU layer per hidden size, then regression.
pub fn default_layer_specs(net_inputs: usize, hidden_layer_sizes: &[usize], num_actions: usize) -> Vec<LayerSpec> {
    let mut specs = Vec::with_capacity(hidden_layer_sizes.len() + 2);
    specs.push(LayerSpec::input(net_inputs));
    specs.extend(
        hidden_layer_sizes
            .iter()
            .map(|&size| LayerSpec::fully_connected(size, Activation::Relu)),
    );
    specs.push(LayerSpec::regression(num_actions));
    specs
}

/// Check a layout against the brain's input and action counts.
pub fn validate_layer_specs(specs: &[LayerSpec], net_inputs: usize, num_actions: usize) -> Result<()> {
    if specs.len() < 2 {
        return Err(BrainError::InvalidLayerSpec(
            "need at least an input and a regression layer".to_string(),
        ));
    }

    let last = specs.len() - 1;
    for (i, spec) in specs.iter().enumerate() {
        match spec {
            LayerSpec::Input { .. } if i != 0 => {
                return Err(BrainError::InvalidLayerSpec(format!(
                    "input layer at position {}, only the first layer may be an input",
                    i
                )));
            }
            LayerSpec::Regression { .. } if i != last => {
                return Err(BrainError::InvalidLayerSpec(format!(
                    "regression layer at position {}, only the last layer may be a regression",
                    i
                )));
            }
            _ => {}
        }
        if spec.size() == 0 {
            return Err(BrainError::InvalidLayerSpec(format!("layer {} has no outputs", i)));
        }
    }

    if !matches!(specs[0], LayerSpec::Input { .. }) {
        return Err(BrainError::InvalidLayerSpec("first layer must be an input layer".to_string()));
    }
    if !matches!(specs[last], LayerSpec::Regression { .. }) {
        return Err(BrainError::InvalidLayerSpec("last layer must be a regression layer".to_string()));
    }
    if specs[0].size() != net_inputs {
        return Err(BrainError::dimension_mismatch(
            format!("input volume of {}", net_inputs),
            format!("{}", specs[0].size()),
        ));
    }
    if specs[last].size() != num_actions {
        return Err(BrainError::dimension_mismatch(
            format!("{} regression neurons", num_actions),
            format!("{}", specs[last].size()),
        ));
    }
    Ok(())
}

/// Builds a [`NeuralNetwork`] from a layer layout
pub struct NetworkBuilder {
    specs: Vec<LayerSpec>,
    init: WeightInit,
}

impl NetworkBuilder {
    /// Create a new network builder
    pub fn new() -> Self {
        NetworkBuilder {
            specs: Vec::new(),
            init: WeightInit::default(),
        }
    }

    /// Start from a full layout
    pub fn from_specs(specs: &[LayerSpec]) -> Self {
        NetworkBuilder {
            specs: specs.to_vec(),
            ..Self::new()
        }
    }

    pub fn input(mut self, depth: usize) -> Self {
        self.specs.push(LayerSpec::input(depth));
        self
    }

    /// Add a fully connected layer
    pub fn add_dense(mut self, num_neurons: usize, activation: Activation) -> Self {
        self.specs.push(LayerSpec::fully_connected(num_neurons, activation));
        self
    }

    pub fn regression(mut self, num_neurons: usize) -> Self {
        self.specs.push(LayerSpec::regression(num_neurons));
        self
    }

    pub fn weight_init(mut self, init: WeightInit) -> Self {
        self.init = init;
        self
    }

    pub fn specs(&self) -> &[LayerSpec] {
        &self.specs
    }

    /// Build the network, drawing initial weights from `rng`
    pub fn build_using<R: Rng + ?Sized>(self, rng: &mut R) -> Result<NeuralNetwork> {
        let (first, rest) = match self.specs.split_first() {
            Some(split) => split,
            None => {
                return Err(BrainError::InvalidLayerSpec("no layers specified".to_string()));
            }
        };
        let outputs = self.specs.last().map_or(0, LayerSpec::size);
        validate_layer_specs(&self.specs, first.size(), outputs)?;

        let mut layers = Vec::with_capacity(rest.len());
        let mut input_size = first.size();
        for spec in rest {
            let activation = match *spec {
                LayerSpec::FullyConnected { activation, .. } => activation,
                _ => Activation::Linear,
            };
            layers.push(Layer::new_using(input_size, spec.size(), activation, self.init, rng));
            input_size = spec.size();
        }
        NeuralNetwork::new(layers)
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
