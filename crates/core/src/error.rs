// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote engine call failed (network or engine-side error)
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// True for failures surfaced by the remote engine
    pub fn is_engine(&self) -> bool {
        matches!(self, AppError::Engine(_))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
