use tracing::warn;

use crate::config::BrainOptions;
use crate::error::{BrainError, Result};
use crate::replay_buffer::ReplayBuffer;

/// Builder for the brain's replay memory
#[derive(Clone, Debug, Default)]
pub struct ReplayBufferBuilder {
    capacity: Option<usize>,
    learn_threshold: Option<usize>,
}

impl ReplayBufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity and learn threshold taken from brain options
    pub fn from_options(options: &BrainOptions) -> Self {
        ReplayBufferBuilder::new()
            .capacity(options.experience_size)
            .learn_threshold(options.start_learn_threshold)
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Number of stored experiences the brain waits for before replaying
    pub fn learn_threshold(mut self, threshold: usize) -> Self {
        self.learn_threshold = Some(threshold);
        self
    }

    pub fn build(self) -> Result<ReplayBuffer> {
        let capacity = match self.capacity {
            Some(0) => {
                return Err(BrainError::invalid_parameter("experience_size", "must be greater than 0"))
            }
            Some(capacity) => capacity,
            None => return Err(BrainError::invalid_parameter("experience_size", "not specified")),
        };

        if let Some(threshold) = self.learn_threshold {
            if threshold >= capacity {
                warn!(
                    start_learn_threshold = threshold,
                    experience_size = capacity,
                    "replay memory can never exceed the learn threshold, the brain will not learn"
                );
            }
        }

        Ok(ReplayBuffer::new(capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_from_brain_options() {
        let options = BrainOptions::with_experience_size(500);
        let buffer = ReplayBufferBuilder::from_options(&options).build().unwrap();
        assert_eq!(buffer.capacity(), 500);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_unreachable_threshold_still_builds() {
        let buffer = ReplayBufferBuilder::new()
            .capacity(10)
            .learn_threshold(10)
            .build()
            .unwrap();
        assert_eq!(buffer.capacity(), 10);
    }

    #[test]
    fn test_capacity_is_required() {
        let missing = ReplayBufferBuilder::new().build();
        assert!(matches!(missing, Err(BrainError::InvalidParameter { .. })));

        let options = BrainOptions {
            experience_size: 0,
            ..Default::default()
        };
        match ReplayBufferBuilder::from_options(&options).build() {
            Err(BrainError::InvalidParameter { name, .. }) => assert_eq!(name, "experience_size"),
            other => panic!("expected InvalidParameter, got {:?}", other.map(|b| b.capacity())),
        }
    }
}
