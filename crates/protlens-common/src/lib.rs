//! ProtLens Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the ProtLens workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`ProtlensError`] and the [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//! - **Types**: the [`types::Accession`] identifier and service URL helpers
//!
//! # Example
//!
//! ```
//! use protlens_common::types::Accession;
//!
//! let accession: Accession = "P01308".parse().unwrap();
//! assert_eq!(accession.as_str(), "P01308");
//! assert!("insulin".parse::<Accession>().is_err());
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{ProtlensError, Result};
pub use types::Accession;
