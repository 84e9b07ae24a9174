//! Error types shared by ProtLens crates

use thiserror::Error;

/// Result type alias for shared ProtLens operations
pub type Result<T> = std::result::Result<T, ProtlensError>;

/// Main error type for the shared library
#[derive(Error, Debug)]
pub enum ProtlensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid accession '{0}': expected 6 to 10 uppercase letters or digits")]
    InvalidAccession(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProtlensError {
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
