use ndarray::{Array1, ArrayView1};

use super::window::SlidingWindow;

/// Builds the value network input from the current observation and the
/// recent history.
///
/// The layout is `[x_t, x_{t-1}, onehot(a_{t-1}), x_{t-2}, onehot(a_{t-2}), ...]`
/// with `temporal_window` history pairs. The hot entry of each one-of-k
/// action vector is `num_states` rather than 1, which keeps it on the same
/// scale as a full observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemporalEncoder {
    num_states: usize,
    num_actions: usize,
    temporal_window: usize,
}

impl TemporalEncoder {
    pub fn new(num_states: usize, num_actions: usize, temporal_window: usize) -> Self {
        TemporalEncoder {
            num_states,
            num_actions,
            temporal_window,
        }
    }

    /// Length of every encoded vector
    pub fn input_size(&self) -> usize {
        self.num_states * self.temporal_window + self.num_actions * self.temporal_window + self.num_states
    }

    /// Encode `observation` against the state and action windows.
    ///
    /// The windows must hold at least `temporal_window` entries; position
    /// `len - 1 - k` supplies history pair `k`.
    pub fn encode(
        &self,
        observation: ArrayView1<f32>,
        states: &SlidingWindow<Array1<f32>>,
        actions: &SlidingWindow<usize>,
    ) -> Array1<f32> {
        let mut encoded = Vec::with_capacity(self.input_size());
        encoded.extend(observation.iter().copied());

        let n = states.len();
        for k in 0..self.temporal_window {
            encoded.extend(states[n - 1 - k].iter().copied());

            let mut one_hot = vec![0.0; self.num_actions];
            one_hot[actions[n - 1 - k]] = self.num_states as f32;
            encoded.extend(one_hot);
        }

        Array1::from_vec(encoded)
    }
}
