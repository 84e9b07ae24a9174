//! Common types used across ProtLens

use crate::error::ProtlensError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Shape of a knowledge-base accession: 6 to 10 uppercase letters or digits.
#[allow(clippy::expect_used)]
static ACCESSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{6,10}$").expect("accession pattern is a valid regex"));

/// Returns true when `candidate` already looks like an accession.
///
/// The check is purely syntactic: `"P01308"` and `"Q9Y6K9"` match, but so
/// would a six-letter uppercase gene symbol such as `"SHROOM"`. Lowercase
/// input never matches.
pub fn is_accession(candidate: &str) -> bool {
    ACCESSION_PATTERN.is_match(candidate)
}

/// A resolved knowledge-base identifier
///
/// Construction always goes through the accession pattern check, so every
/// `Accession` value is safe to splice into a request path.
///
/// # Examples
///
/// ```
/// use protlens_common::types::Accession;
///
/// let accession = Accession::new("Q9Y6K9").unwrap();
/// assert_eq!(accession.to_string(), "Q9Y6K9");
/// assert!(Accession::new("q9y6k9").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Accession(String);

impl Accession {
    pub fn new(value: impl Into<String>) -> Result<Self, ProtlensError> {
        let value = value.into();
        if is_accession(&value) {
            Ok(Self(value))
        } else {
            Err(ProtlensError::InvalidAccession(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Accession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Accession {
    type Err = ProtlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Accession {
    type Error = ProtlensError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Accession> for String {
    fn from(accession: Accession) -> Self {
        accession.0
    }
}

impl AsRef<str> for Accession {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Join a base URL and a path segment with exactly one slash between them
pub fn join_url(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}

/// Check that `raw` parses as an absolute http(s) URL
pub fn validate_http_url(raw: &str) -> Result<url::Url, ProtlensError> {
    let parsed =
        url::Url::parse(raw).map_err(|e| ProtlensError::invalid_url(raw, e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ProtlensError::invalid_url(
            raw,
            format!("unsupported scheme '{}'", other),
        )),
    }
}
