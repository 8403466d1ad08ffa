//! Custom error types for the contract analysis engine.

use thiserror::Error;

/// Unified error type propagated through every analysis operation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input validation error: {0}")]
    InputValidation(String),

    #[error("Graph source error: {0}")]
    GraphSource(String),

    #[error("Constraint error: {0}")]
    Constraint(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
