//! Error types for loss stages and pipelines

/// Result type for loss-model operations
pub type LossResult<T> = Result<T, LossError>;

/// Errors that can occur while building or evaluating a loss pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LossError {
    /// A stage or schedule was given parameters outside their valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Shared state reached a value no mutator can produce
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl LossError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LossError::InvalidConfig(msg.into())
    }
}
