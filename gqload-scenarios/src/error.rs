//! Scenario error types

use gqload_http::HttpError;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid variables for {operation}: expected a JSON object, got {found}")]
    InvalidVariables { operation: String, found: String },

    #[error("Duplicate operation: {0}")]
    DuplicateOperation(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error(transparent)]
    Http(#[from] HttpError),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
