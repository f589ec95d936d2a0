//! Error types for contgen

use thiserror::Error;

/// Result type alias using contgen's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for contgen operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Generation error: {0}")]
    Generation(String),
}
