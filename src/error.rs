use std::fmt;

/// Result type for brain operations
pub type Result<T> = std::result::Result<T, BrainError>;

/// Main error type for the crate
#[derive(Debug, Clone, PartialEq)]
pub enum BrainError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Malformed layer specification list
    InvalidLayerSpec(String),

    /// `backward` called before `forward` populated the windows
    Sequencing(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),

    /// Empty buffer or container
    EmptyBuffer(String),

    /// Invalid action
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Training error
    TrainingError(String),
}

impl fmt::Display for BrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrainError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            BrainError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            BrainError::InvalidLayerSpec(msg) => write!(f, "Invalid layer specification: {}", msg),
            BrainError::Sequencing(msg) => write!(f, "Sequencing error: {}", msg),
            BrainError::IoError(msg) => write!(f, "IO error: {}", msg),
            BrainError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            BrainError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            BrainError::EmptyBuffer(msg) => write!(f, "Empty buffer: {}", msg),
            BrainError::InvalidAction { action, max_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, max_actions)
            }
            BrainError::TrainingError(msg) => write!(f, "Training error: {}", msg),
        }
    }
}

impl std::error::Error for BrainError {}

impl From<std::io::Error> for BrainError {
    fn from(err: std::io::Error) -> Self {
        BrainError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for BrainError {
    fn from(err: bincode::Error) -> Self {
        BrainError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for BrainError {
    fn from(err: serde_json::Error) -> Self {
        BrainError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl BrainError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        BrainError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        BrainError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while validating construction-time configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BrainError::DimensionMismatch { .. }
                | BrainError::InvalidParameter { .. }
                | BrainError::InvalidLayerSpec(_)
        )
    }
}
