use wxloss_core::LossError;

/// Result type for scenario operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while setting up or running a scenario
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error(transparent)]
    Loss(#[from] LossError),
}
