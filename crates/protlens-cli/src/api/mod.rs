//! API client module
//!
//! HTTP clients for the knowledge base and the structure-summary service.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::ApiClient;
pub use types::*;
