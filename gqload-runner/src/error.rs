//! Runner error types

use gqload_scenarios::ScenarioError;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Invalid threshold '{expression}': {reason}")]
    InvalidThreshold { expression: String, reason: String },

    #[error("Unknown threshold metric: {0}")]
    UnknownMetric(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

pub type RunnerResult<T> = Result<T, RunnerError>;
