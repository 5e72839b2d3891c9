use ndarray::{Array2, Array1};
use serde::{Serialize, Deserialize};

use crate::config::TrainerMethod;

/// Parameter update rule. Per-parameter state is kept per layer index.
pub trait Optimizer {
    /// Called once per parameter update, before any layer is touched
    fn begin_step(&mut self) {}

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl OptimizerWrapper {
    pub fn from_method(method: TrainerMethod, momentum: f32) -> Self {
        match method {
            TrainerMethod::Sgd => OptimizerWrapper::SGD(SGD::with_momentum(momentum)),
            TrainerMethod::Adam { beta1, beta2, epsilon } => {
                OptimizerWrapper::Adam(Adam::new(beta1, beta2, epsilon))
            }
        }
    }
}

impl Optimizer for OptimizerWrapper {
    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
        }
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }
}

fn state_slot<T>(states: &mut Vec<Option<T>>, index: usize, init: impl FnOnce() -> T) -> &mut T {
    if states.len() <= index {
        states.resize_with(index + 1, || None);
    }
    states[index].get_or_insert_with(init)
}

/// Stochastic gradient descent with optional classical momentum
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SGD {
    pub momentum: f32,
    weight_velocity: Vec<Option<Array2<f32>>>,
    bias_velocity: Vec<Option<Array1<f32>>>,
}

impl SGD {
    pub fn new() -> SGD {
        SGD::default()
    }

    pub fn with_momentum(momentum: f32) -> SGD {
        SGD {
            momentum,
            ..SGD::default()
        }
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        if self.momentum > 0.0 {
            let momentum = self.momentum;
            let velocity = state_slot(&mut self.weight_velocity, layer, || Array2::zeros(weights.dim()));
            velocity.zip_mut_with(gradients, |v, &g| *v = momentum * *v - learning_rate * g);
            *weights += &*velocity;
        } else {
            weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        if self.momentum > 0.0 {
            let momentum = self.momentum;
            let velocity = state_slot(&mut self.bias_velocity, layer, || Array1::zeros(biases.dim()));
            velocity.zip_mut_with(gradients, |v, &g| *v = momentum * *v - learning_rate * g);
            *biases += &*velocity;
        } else {
            biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
        }
    }
}

/// Adam with bias-corrected first and second moment estimates
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Option<Array2<f32>>>,
    v_weights: Vec<Option<Array2<f32>>>,
    m_biases: Vec<Option<Array1<f32>>>,
    v_biases: Vec<Option<Array1<f32>>>,
    /// Number of parameter updates performed so far
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 0,
        }
    }

    fn corrections(&self) -> (f32, f32) {
        let t = self.t.max(1);
        (1.0 - self.beta1.powi(t), 1.0 - self.beta2.powi(t))
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let (c1, c2) = self.corrections();

        let m = state_slot(&mut self.m_weights, layer, || Array2::zeros(weights.dim()));
        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        let m = m.clone();
        let v = state_slot(&mut self.v_weights, layer, || Array2::zeros(weights.dim()));
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        ndarray::Zip::from(weights)
            .and(&m)
            .and(&*v)
            .for_each(|w, &m, &v| *w -= learning_rate * (m / c1) / ((v / c2).sqrt() + epsilon));
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let (c1, c2) = self.corrections();

        let m = state_slot(&mut self.m_biases, layer, || Array1::zeros(biases.dim()));
        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        let m = m.clone();
        let v = state_slot(&mut self.v_biases, layer, || Array1::zeros(biases.dim()));
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        ndarray::Zip::from(biases)
            .and(&m)
            .and(&*v)
            .for_each(|b, &m, &v| *b -= learning_rate * (m / c1) / ((v / c2).sqrt() + epsilon));
    }
}
