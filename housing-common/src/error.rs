//! Common error types for the housing service

use thiserror::Error;

use crate::model::ModelError;
use crate::preprocess::PreprocessError;

/// Common result type for housing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the housing crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Preprocessing pipeline failure
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    /// Model loading or prediction failure
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
