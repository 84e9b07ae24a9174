//! Search flow and view state
//!
//! A search moves the view through `Idle -> Loading -> Ready | Error`.
//! Every submission takes a new generation number before it suspends for the
//! first time. Results are applied only while their generation is still the
//! latest one issued, so a slow earlier search can never overwrite a later
//! one. Superseded requests are not cancelled; their results are dropped.

use crate::api::types::{ProteinRecord, StructureCandidate};
use crate::api::ApiClient;
use crate::error::{CliError, ErrorKind};
use crate::resolver::Resolver;
use crate::viewer::SelectedStructure;
use protlens_common::types::Accession;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Where the current search stands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    Loading,
    Ready,
    Error { message: String, kind: ErrorKind },
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub state: SearchState,
    pub query: String,
    pub record: Option<ProteinRecord>,
    pub structures: Vec<StructureCandidate>,
    /// Structure request still in flight
    pub structures_pending: bool,
    pub selected: Option<SelectedStructure>,
    #[serde(skip)]
    pub generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            state: SearchState::Idle,
            query: String::new(),
            record: None,
            structures: Vec::new(),
            structures_pending: false,
            selected: None,
            generation: 0,
        }
    }
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        self.state == SearchState::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SearchState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Drives searches and owns the view state
#[derive(Clone)]
pub struct SearchController {
    client: ApiClient,
    resolver: Resolver,
    state: Arc<RwLock<ViewState>>,
    generation: Arc<AtomicU64>,
}

impl SearchController {
    pub fn new(client: ApiClient, resolver: Resolver) -> Self {
        Self {
            client,
            resolver,
            state: Arc::new(RwLock::new(ViewState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run one search to completion and return its generation
    ///
    /// The returned generation may already be superseded by a later
    /// submission, in which case nothing this call fetched was applied.
    #[instrument(skip(self))]
    pub async fn submit(&self, query: &str) -> u64 {
        let query = query.trim().to_string();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.apply(generation, |view| {
            *view = ViewState {
                state: SearchState::Loading,
                query: query.clone(),
                structures_pending: true,
                generation,
                ..ViewState::default()
            };
        })
        .await;

        let accession = match self.resolver.resolve(&query).await {
            Ok(accession) => accession,
            Err(e) => {
                self.fail(generation, e).await;
                return generation;
            },
        };

        info!(query = %query, accession = %accession, generation, "Fetching protein data");

        tokio::join!(
            self.load_record(generation, &accession),
            self.load_structures(generation, &accession)
        );

        generation
    }

    async fn load_record(&self, generation: u64, accession: &Accession) {
        match self.client.fetch_protein(accession).await {
            Ok(record) => {
                self.apply(generation, |view| {
                    if view.is_loading() {
                        view.record = Some(record);
                        view.state = SearchState::Ready;
                    }
                })
                .await;
            },
            Err(e) => self.fail(generation, e).await,
        }
    }

    async fn load_structures(&self, generation: u64, accession: &Accession) {
        let structures = self.client.fetch_structures(accession).await;
        self.apply(generation, |view| {
            view.structures_pending = false;
            if matches!(view.state, SearchState::Error { .. }) {
                return;
            }
            view.selected = structures.first().map(SelectedStructure::from);
            view.structures = structures;
        })
        .await;
    }

    async fn fail(&self, generation: u64, error: CliError) {
        let kind = error.kind();
        let message = error.to_string();
        debug!(generation, ?kind, "Search failed");

        self.apply(generation, |view| {
            *view = ViewState {
                state: SearchState::Error { message, kind },
                query: std::mem::take(&mut view.query),
                generation,
                ..ViewState::default()
            };
        })
        .await;
    }

    /// Mutate the view if `generation` is still the latest submission
    async fn apply(&self, generation: u64, update: impl FnOnce(&mut ViewState)) -> bool {
        let mut view = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Dropping stale search response");
            return false;
        }
        update(&mut view);
        true
    }

    /// Pick another candidate from the current list
    pub async fn select(&self, identifier: &str) -> Result<SelectedStructure, CliError> {
        let mut view = self.state.write().await;
        let candidate = view
            .structures
            .iter()
            .find(|c| c.identifier == identifier)
            .ok_or_else(|| CliError::UnknownStructure {
                identifier: identifier.to_string(),
                accession: view
                    .record
                    .as_ref()
                    .map(|r| r.accession.to_string())
                    .unwrap_or_else(|| view.query.clone()),
            })?;

        let selected = SelectedStructure::from(candidate);
        view.selected = Some(selected.clone());
        Ok(selected)
    }

    /// Copy of the current view state
    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Latest generation issued
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Resolver used for queries
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resolver::SymbolMap;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entry(accession: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "primaryAccession": accession,
            "uniProtkbId": name,
            "comments": [
                { "commentType": "FUNCTION", "texts": [{ "value": "Does things (PubMed:1)." }] }
            ]
        })
    }

    fn summary(ids: &[&str]) -> serde_json::Value {
        let structures: Vec<_> = ids
            .iter()
            .map(|id| {
                serde_json::json!({ "summary": {
                    "model_identifier": id,
                    "model_category": "EXPERIMENTALLY DETERMINED",
                    "model_url": format!("http://files.test/{}.cif", id)
                }})
            })
            .collect();
        serde_json::json!({ "structures": structures })
    }

    fn controller(server: &MockServer) -> SearchController {
        let config = Config::new()
            .with_overrides(
                Some(&format!("{}/uniprotkb", server.uri())),
                Some(&format!("{}/summary", server.uri())),
            )
            .unwrap();
        let symbols: SymbolMap = [
            ("INS", Accession::new("P01308").unwrap()),
            ("HBB", Accession::new("P68871").unwrap()),
        ]
        .into_iter()
        .collect();
        SearchController::new(ApiClient::new(&config).unwrap(), Resolver::with_map(symbols))
    }

    async fn mount_protein(server: &MockServer, accession: &str, name: &str, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(format!("/uniprotkb/{}", accession)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(entry(accession, name))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let server = MockServer::start().await;
        let view = controller(&server).snapshot().await;
        assert_eq!(view.state, SearchState::Idle);
        assert!(view.record.is_none());
    }

    #[tokio::test]
    async fn test_symbol_search_reaches_ready() {
        let server = MockServer::start().await;
        mount_protein(&server, "P01308", "INS_HUMAN", Duration::ZERO).await;
        Mock::given(method("GET"))
            .and(path("/summary/P01308.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(summary(&["1a7f", "2hiu"])))
            .mount(&server)
            .await;

        let controller = controller(&server);
        controller.submit("  INS ").await;
        let view = controller.snapshot().await;

        assert_eq!(view.state, SearchState::Ready);
        assert_eq!(view.query, "INS");
        assert_eq!(view.record.unwrap().entry_name.as_deref(), Some("INS_HUMAN"));
        assert_eq!(view.structures.len(), 2);
        assert!(!view.structures_pending);
        assert_eq!(view.selected.unwrap().identifier, "1a7f");

        let picked = controller.select("2hiu").await.unwrap();
        assert_eq!(picked.file_url, "http://files.test/2hiu.cif");
        assert_eq!(controller.snapshot().await.selected.unwrap().identifier, "2hiu");
        assert!(matches!(
            controller.select("9zzz").await,
            Err(CliError::UnknownStructure { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_candidates_still_ready() {
        let server = MockServer::start().await;
        mount_protein(&server, "P01308", "INS_HUMAN", Duration::ZERO).await;
        Mock::given(method("GET"))
            .and(path("/summary/P01308.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let controller = controller(&server);
        controller.submit("P01308").await;
        let view = controller.snapshot().await;

        assert_eq!(view.state, SearchState::Ready);
        assert!(view.structures.is_empty());
        assert!(view.selected.is_none());
    }

    #[tokio::test]
    async fn test_unmapped_symbol_is_resolution_error() {
        let server = MockServer::start().await;
        let controller = controller(&server);
        controller.submit("notagene").await;
        let view = controller.snapshot().await;

        assert_eq!(
            view.error_message().unwrap(),
            CliError::NoMapping("notagene".into()).to_string()
        );
        assert!(matches!(
            view.state,
            SearchState::Error { kind: ErrorKind::Resolution, .. }
        ));
        assert!(view.record.is_none());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_annotation_failure_clears_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uniprotkb/P01308"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/summary/P01308.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(summary(&["1a7f"])))
            .mount(&server)
            .await;

        let controller = controller(&server);
        controller.submit("INS").await;
        let view = controller.snapshot().await;

        assert!(matches!(
            view.state,
            SearchState::Error { kind: ErrorKind::AnnotationFetch, .. }
        ));
        assert!(view.record.is_none());
        assert!(view.structures.is_empty());
        assert!(view.selected.is_none());
    }

    #[tokio::test]
    async fn test_slow_earlier_search_never_overwrites_later_one() {
        let server = MockServer::start().await;
        mount_protein(&server, "P01308", "INS_HUMAN", Duration::from_millis(400)).await;
        mount_protein(&server, "P68871", "HBB_HUMAN", Duration::ZERO).await;
        Mock::given(method("GET"))
            .and(path("/summary/P01308.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(summary(&["1a7f"]))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/summary/P68871.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(summary(&["2hhb"])))
            .mount(&server)
            .await;

        let controller = controller(&server);
        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("INS").await })
        };
        // Let the first submission take its generation before the second.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let fast = controller.submit("HBB").await;
        let slow = slow.await.unwrap();

        assert!(fast > slow);
        assert_eq!(controller.generation(), fast);

        let view = controller.snapshot().await;
        assert_eq!(view.state, SearchState::Ready);
        assert_eq!(view.query, "HBB");
        assert_eq!(view.record.unwrap().accession.as_str(), "P68871");
        assert_eq!(view.structures[0].identifier, "2hhb");
    }
}
