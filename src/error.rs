//! Error handling for the token loader

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenLoaderError {
    #[error("Token file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error("Unsupported data format in token file: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Pickle error: {0}")]
    Pickle(#[from] serde_pickle::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, TokenLoaderError>;

/// Convert HTTP client errors to our custom error type
impl From<reqwest::Error> for TokenLoaderError {
    fn from(err: reqwest::Error) -> Self {
        TokenLoaderError::Storage(err.to_string())
    }
}

impl TokenLoaderError {
    /// Short name of the failure kind, used in CLI diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            TokenLoaderError::NotFound(_) => "not-found",
            TokenLoaderError::UnsupportedExtension(_) => "unsupported-extension",
            TokenLoaderError::UnsupportedFormat(_) => "unsupported-format",
            TokenLoaderError::Io(_) => "io",
            TokenLoaderError::Json(_) | TokenLoaderError::Csv(_) | TokenLoaderError::Pickle(_) => {
                "decode"
            }
            TokenLoaderError::Configuration(_) => "configuration",
            TokenLoaderError::MissingCredentials(_) => "missing-credentials",
            TokenLoaderError::Storage(_) => "storage",
            TokenLoaderError::InvalidInput(_) => "invalid-input",
        }
    }
}
