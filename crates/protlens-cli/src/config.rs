//! Configuration management for the ProtLens CLI
//!
//! Settings come from the environment (a `.env` file is honored) and can be
//! overridden by command-line flags.

use crate::error::{CliError, Result};
use protlens_common::types::validate_http_url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Default knowledge-base endpoint; the accession is appended as a path segment.
pub const DEFAULT_UNIPROT_URL: &str = "https://rest.uniprot.org/uniprotkb";

/// Default structure-summary endpoint; `<accession>.json` is appended.
pub const DEFAULT_STRUCTURES_URL: &str =
    "https://www.ebi.ac.uk/pdbe/pdbe-kb/3dbeacons/api/uniprot/summary";

/// Default timeout for a single HTTP request in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// How long the loading indicator lingers after a search completes.
pub const DEFAULT_LOADING_TRAILING_MS: u64 = 400;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Knowledge-base (UniProt) base URL
    pub uniprot_url: String,

    /// Structure-summary (3D-Beacons) base URL
    pub structures_url: String,

    /// Gene symbol map file; the bundled map is used when unset
    pub symbol_map: Option<PathBuf>,

    /// Per-request HTTP timeout in seconds
    pub http_timeout_secs: u64,

    /// Trailing delay of the loading indicator in milliseconds
    pub loading_trailing_ms: u64,
}

impl Config {
    /// Create a config with default values
    pub fn new() -> Self {
        Self {
            uniprot_url: DEFAULT_UNIPROT_URL.to_string(),
            structures_url: DEFAULT_STRUCTURES_URL.to_string(),
            symbol_map: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            loading_trailing_ms: DEFAULT_LOADING_TRAILING_MS,
        }
    }

    /// Load config from environment variables
    ///
    /// - `PROTLENS_UNIPROT_URL`
    /// - `PROTLENS_STRUCTURES_URL`
    /// - `PROTLENS_SYMBOL_MAP`
    /// - `PROTLENS_HTTP_TIMEOUT_SECS`
    /// - `PROTLENS_LOADING_TRAILING_MS`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::new();

        if let Ok(url) = std::env::var("PROTLENS_UNIPROT_URL") {
            config.uniprot_url = url;
        }

        if let Ok(url) = std::env::var("PROTLENS_STRUCTURES_URL") {
            config.structures_url = url;
        }

        if let Ok(path) = std::env::var("PROTLENS_SYMBOL_MAP") {
            if !path.trim().is_empty() {
                config.symbol_map = Some(PathBuf::from(path));
            }
        }

        if let Ok(secs) = std::env::var("PROTLENS_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = secs.parse().map_err(|_| {
                CliError::config(format!("PROTLENS_HTTP_TIMEOUT_SECS must be an integer, got '{}'", secs))
            })?;
        }

        if let Ok(ms) = std::env::var("PROTLENS_LOADING_TRAILING_MS") {
            config.loading_trailing_ms = ms.parse().map_err(|_| {
                CliError::config(format!("PROTLENS_LOADING_TRAILING_MS must be an integer, got '{}'", ms))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_overrides(mut self, uniprot_url: Option<&str>, structures_url: Option<&str>) -> Result<Self> {
        if let Some(url) = uniprot_url {
            self.uniprot_url = url.to_string();
        }
        if let Some(url) = structures_url {
            self.structures_url = url.to_string();
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_http_url(&self.uniprot_url)?;
        validate_http_url(&self.structures_url)?;

        if self.http_timeout_secs == 0 {
            return Err(CliError::config("HTTP timeout must be greater than 0"));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn loading_trailing_delay(&self) -> Duration {
        Duration::from_millis(self.loading_trailing_ms)
    }

    /// Look up a single setting by key, as used by `protlens config get`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "uniprot_url" => Some(self.uniprot_url.clone()),
            "structures_url" => Some(self.structures_url.clone()),
            "symbol_map" => Some(
                self.symbol_map
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(bundled)".to_string()),
            ),
            "http_timeout_secs" => Some(self.http_timeout_secs.to_string()),
            "loading_trailing_ms" => Some(self.loading_trailing_ms.to_string()),
            _ => None,
        }
    }

    /// All setting keys in display order
    pub fn keys() -> &'static [&'static str] {
        &[
            "uniprot_url",
            "structures_url",
            "symbol_map",
            "http_timeout_secs",
            "loading_trailing_ms",
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_are_valid() {
        let config = Config::new();
        assert_eq!(config.uniprot_url, DEFAULT_UNIPROT_URL);
        assert!(config.symbol_map.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.loading_trailing_delay(), Duration::from_millis(400));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::new()
            .with_overrides(Some("http://127.0.0.1:9000/uniprotkb"), None)
            .unwrap();
        assert_eq!(config.uniprot_url, "http://127.0.0.1:9000/uniprotkb");
        assert_eq!(config.structures_url, DEFAULT_STRUCTURES_URL);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(Config::new().with_overrides(Some("not a url"), None).is_err());

        let mut config = Config::new();
        config.http_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_get_keys() {
        let config = Config::new();
        for key in Config::keys() {
            assert!(config.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(config.get("symbol_map").unwrap(), "(bundled)");
        assert!(config.get("nope").is_none());
    }
}
