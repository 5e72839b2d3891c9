use ndarray::Array1;
use serde::{Serialize, Deserialize};

use crate::error::{BrainError, Result};
use crate::random::RandomSource;

/// One recorded transition between two consecutive encoded inputs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state0: Array1<f32>,
    pub action0: usize,
    pub reward0: f32,
    pub state1: Array1<f32>,
}

impl Experience {
    pub fn new(state0: Array1<f32>, action0: usize, reward0: f32, state1: Array1<f32>) -> Self {
        Experience {
            state0,
            action0,
            reward0,
            state1,
        }
    }
}

/// Fixed-capacity experience memory.
///
/// Experiences are appended until the buffer is full. After that every new
/// experience overwrites a uniformly chosen slot, so old and new experiences
/// are evicted alike.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: Vec<Experience>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        ReplayBuffer {
            buffer: Vec::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Store `experience` and return the slot it was written to.
    pub fn add<R: RandomSource + ?Sized>(&mut self, experience: Experience, rng: &mut R) -> usize {
        if self.buffer.len() < self.capacity {
            self.buffer.push(experience);
            self.buffer.len() - 1
        } else {
            let slot = rng.index(self.capacity);
            self.buffer[slot] = experience;
            slot
        }
    }

    /// Draw `batch_size` experiences uniformly, with replacement.
    pub fn sample<R: RandomSource + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Vec<&Experience>> {
        if self.buffer.is_empty() {
            return Err(BrainError::EmptyBuffer("cannot sample from an empty replay buffer".to_string()));
        }
        Ok((0..batch_size)
            .map(|_| &self.buffer[rng.index(self.buffer.len())])
            .collect())
    }

    pub fn sample_one<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<&Experience> {
        if self.buffer.is_empty() {
            return Err(BrainError::EmptyBuffer("cannot sample from an empty replay buffer".to_string()));
        }
        Ok(&self.buffer[rng.index(self.buffer.len())])
    }

    pub fn get(&self, index: usize) -> Option<&Experience> {
        self.buffer.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
