//! Error types for azpost

use thiserror::Error;

/// azpost error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error (shape or configuration mismatch)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// The reaction engine rejected the physics parameters.
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
