//! HTTP API client for the remote protein services
//!
//! One client talks to both the knowledge base and the structure-summary
//! service. Every call is attempted exactly once; there is no retry policy.

use crate::api::{endpoints, types::*};
use crate::config::Config;
use crate::error::{CliError, Result};
use protlens_common::types::Accession;
use reqwest::{header, Client};
use tracing::{debug, instrument, warn};

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("protlens/", env!("CARGO_PKG_VERSION"));

/// API client for the protein services
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    uniprot_url: String,
    structures_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            uniprot_url: config.uniprot_url.clone(),
            structures_url: config.structures_url.clone(),
        })
    }

    /// Fetch and normalize the knowledge-base entry
    ///
    /// A non-success status is fatal for the search and maps to
    /// [`CliError::AnnotationFetch`].
    #[instrument(skip(self), fields(accession = %accession))]
    pub async fn fetch_protein(&self, accession: &Accession) -> Result<ProteinRecord> {
        let url = endpoints::protein_url(&self.uniprot_url, accession);
        debug!(url = %url, "Fetching annotation");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CliError::AnnotationFetch {
                accession: accession.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let entry: UniprotEntry = serde_json::from_str(&body)?;

        Ok(ProteinRecord::from_entry(entry, accession))
    }

    /// Fetch the structure candidates for an accession
    ///
    /// Never fails: an unreachable service, an error status or an
    /// undecodable body all yield an empty list.
    #[instrument(skip(self), fields(accession = %accession))]
    pub async fn fetch_structures(&self, accession: &Accession) -> Vec<StructureCandidate> {
        match self.try_fetch_structures(accession).await {
            Ok(candidates) => {
                debug!(count = candidates.len(), "Structure candidates fetched");
                candidates
            },
            Err(e) => {
                warn!(error = %e, "Structure summary unavailable, continuing without structures");
                Vec::new()
            },
        }
    }

    async fn try_fetch_structures(&self, accession: &Accession) -> Result<Vec<StructureCandidate>> {
        let url = endpoints::structure_summary_url(&self.structures_url, accession);
        debug!(url = %url, "Fetching structure summary");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let summary: BeaconsSummary = response.json().await?;

        Ok(summary.into_candidates())
    }

    /// Underlying HTTP client, shared with the structure viewer
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn uniprot_url(&self) -> &str {
        &self.uniprot_url
    }

    pub fn structures_url(&self) -> &str {
        &self.structures_url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let config = Config::new()
            .with_overrides(
                Some(&format!("{}/uniprotkb", server.uri())),
                Some(&format!("{}/summary", server.uri())),
            )
            .unwrap();
        ApiClient::new(&config).unwrap()
    }

    fn accession() -> Accession {
        Accession::new("P01308").unwrap()
    }

    #[test]
    fn test_api_client_creation() {
        let client = ApiClient::new(&Config::new()).unwrap();
        assert_eq!(client.uniprot_url(), crate::config::DEFAULT_UNIPROT_URL);
        assert_eq!(client.structures_url(), crate::config::DEFAULT_STRUCTURES_URL);
    }

    #[tokio::test]
    async fn test_fetch_protein_non_success_is_annotation_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uniprotkb/P01308"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_protein(&accession()).await.unwrap_err();
        match err {
            CliError::AnnotationFetch { accession, status } => {
                assert_eq!(accession, "P01308");
                assert_eq!(status, 404);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_protein_bad_json_is_other_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uniprotkb/P01308"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_protein(&accession()).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_fetch_structures_errors_yield_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary/P01308.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let candidates = client_for(&server).fetch_structures(&accession()).await;
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_structures_unreachable_yields_empty_list() {
        let config = Config::new()
            .with_overrides(None, Some("http://127.0.0.1:9/summary"))
            .unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert!(client.fetch_structures(&accession()).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_structures_missing_entry_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary/P01308.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client_for(&server).fetch_structures(&accession()).await.is_empty());
    }
}
