use ndarray::{Array1, ArrayView1};
use serde::{Serialize, Deserialize};

/// Trait defining the interface for single-dimension regression losses
pub trait Loss: Send + Sync {
    /// Compute the loss of `prediction[dim]` against `target`
    fn compute(&self, prediction: ArrayView1<f32>, dim: usize, target: f32) -> f32;

    /// Gradient of the loss with respect to the full prediction vector.
    /// Every entry other than `dim` is zero.
    fn gradient(&self, prediction: ArrayView1<f32>, dim: usize, target: f32) -> Array1<f32>;
}

/// Half squared error, `0.5 * (y - target)^2`
pub struct SquaredError;

impl Loss for SquaredError {
    fn compute(&self, prediction: ArrayView1<f32>, dim: usize, target: f32) -> f32 {
        let dy = prediction[dim] - target;
        0.5 * dy * dy
    }

    fn gradient(&self, prediction: ArrayView1<f32>, dim: usize, target: f32) -> Array1<f32> {
        let mut grad = Array1::zeros(prediction.len());
        grad[dim] = prediction[dim] - target;
        grad
    }
}

/// Huber loss (smooth L1)
pub struct HuberLoss {
    pub delta: f32,
}

impl HuberLoss {
    pub fn new(delta: f32) -> Self {
        HuberLoss { delta }
    }
}

impl Loss for HuberLoss {
    fn compute(&self, prediction: ArrayView1<f32>, dim: usize, target: f32) -> f32 {
        let dy = prediction[dim] - target;
        let abs_dy = dy.abs();
        if abs_dy <= self.delta {
            0.5 * dy * dy
        } else {
            self.delta * abs_dy - 0.5 * self.delta * self.delta
        }
    }

    fn gradient(&self, prediction: ArrayView1<f32>, dim: usize, target: f32) -> Array1<f32> {
        let mut grad = Array1::zeros(prediction.len());
        let dy = prediction[dim] - target;
        grad[dim] = dy.clamp(-self.delta, self.delta);
        grad
    }
}

/// Serializable choice of loss for the trainer options
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LossKind {
    #[default]
    Squared,
    Huber { delta: f32 },
}

impl LossKind {
    pub fn compute(&self, prediction: ArrayView1<f32>, dim: usize, target: f32) -> f32 {
        match self {
            LossKind::Squared => SquaredError.compute(prediction, dim, target),
            LossKind::Huber { delta } => HuberLoss::new(*delta).compute(prediction, dim, target),
        }
    }

    pub fn gradient(&self, prediction: ArrayView1<f32>, dim: usize, target: f32) -> Array1<f32> {
        match self {
            LossKind::Squared => SquaredError.gradient(prediction, dim, target),
            LossKind::Huber { delta } => HuberLoss::new(*delta).gradient(prediction, dim, target),
        }
    }
}
