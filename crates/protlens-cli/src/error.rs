//! Error types for the ProtLens CLI
//!
//! Every variant renders as a message that can be shown to the user as-is.
//! Search failures fall into three groups (see [`ErrorKind`]): an unresolved
//! gene symbol, a failed annotation request, and everything else.

use protlens_common::ProtlensError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Gene symbol is not in the symbol map
    #[error("No mapping found for '{0}'. Check the gene symbol or search by UniProt accession instead.")]
    NoMapping(String),

    /// Knowledge-base request returned a non-success status
    #[error("Failed to fetch annotation for '{accession}': server responded with status {status}.")]
    AnnotationFetch { accession: String, status: u16 },

    /// A search ended in an error state; carries the message already shown to the user
    #[error("{0}")]
    SearchFailed(String),

    /// Gene symbol map could not be read
    #[error("Failed to load gene symbol map: {0}")]
    SymbolMap(String),

    /// Requested structure is not among the candidates
    #[error("Structure '{identifier}' is not available for {accession}. Run 'protlens structures {accession}' to list candidates.")]
    UnknownStructure {
        identifier: String,
        accession: String,
    },

    /// Coordinate file could not be turned into a scene
    #[error("Failed to build structure view: {0}")]
    Viewer(String),

    /// Shared library error (accession validation, URL checks)
    #[error(transparent)]
    Common(#[from] ProtlensError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and service URLs.")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or command-line flags.")]
    Config(String),

    /// HTML page rendering failed
    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),

    /// Interactive prompt failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of search failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No mapping for a gene symbol
    Resolution,
    /// Non-success status from the knowledge base
    AnnotationFetch,
    /// Network failures, JSON decoding, anything else
    Other,
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a symbol map error
    pub fn symbol_map(msg: impl Into<String>) -> Self {
        Self::SymbolMap(msg.into())
    }

    /// Create a viewer error
    pub fn viewer(msg: impl Into<String>) -> Self {
        Self::Viewer(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CliError::NoMapping(_) => ErrorKind::Resolution,
            CliError::AnnotationFetch { .. } => ErrorKind::AnnotationFetch,
            _ => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(CliError::NoMapping("FOO".into()).kind(), ErrorKind::Resolution);
        assert_eq!(
            CliError::AnnotationFetch {
                accession: "P01308".into(),
                status: 404
            }
            .kind(),
            ErrorKind::AnnotationFetch
        );
        assert_eq!(CliError::config("bad").kind(), ErrorKind::Other);
    }

    #[test]
    fn test_no_mapping_message_names_symbol() {
        let msg = CliError::NoMapping("notagene".into()).to_string();
        assert!(msg.starts_with("No mapping found for 'notagene'"));
    }

    #[test]
    fn test_search_failed_is_verbatim() {
        let err = CliError::SearchFailed("exact text".into());
        assert_eq!(err.to_string(), "exact text");
    }
}
