//! Error types for cuebind

use std::io;
use thiserror::Error;

/// Main error type for cuebind
///
/// The gesture engine itself never fails on input; errors only come from
/// configuration, replay scripts, the clipboard and invalid chord definitions.
#[derive(Error, Debug)]
pub enum CuebindError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("Invalid gesture: {0}")]
    Gesture(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for cuebind operations
pub type Result<T> = std::result::Result<T, CuebindError>;

impl From<String> for CuebindError {
    fn from(s: String) -> Self {
        CuebindError::Other(s)
    }
}

impl From<&str> for CuebindError {
    fn from(s: &str) -> Self {
        CuebindError::Other(s.to_string())
    }
}
