//! Query to accession resolution
//!
//! A query that already has the accession shape is used verbatim. Anything
//! else is looked up, exactly and case-sensitively, in the gene symbol map.
//!
//! The symbol map is a process-wide, read-only table. [`SymbolMap::global`]
//! is its initialization barrier: the first caller loads it, concurrent
//! callers wait for that same load, and every later caller gets the cached
//! table. A failed load is not cached.

use crate::config::Config;
use crate::error::{CliError, Result};
use protlens_common::types::{is_accession, Accession};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Symbol map shipped with the binary, used when no file is configured
pub const BUNDLED_SYMBOL_MAP: &str = include_str!("../data/gene_symbols.csv");

static GLOBAL_SYMBOLS: OnceCell<SymbolMap> = OnceCell::const_new();

/// Gene symbol to accession table
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    entries: HashMap<String, Accession>,
}

impl SymbolMap {
    /// Parse `symbol,accession` lines
    ///
    /// Lines missing either field, or whose accession does not have the
    /// accession shape, are skipped. Whitespace around fields is ignored.
    /// When a symbol repeats, the first mapping wins.
    pub fn parse(text: &str) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(text.as_bytes());

        let mut entries = HashMap::new();
        let mut skipped = 0usize;

        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    debug!(line = line + 1, error = %e, "Skipping unreadable symbol map line");
                    skipped += 1;
                    continue;
                },
            };

            let symbol = record.get(0).unwrap_or_default();
            let value = record.get(1).unwrap_or_default();

            if symbol.is_empty() || value.is_empty() {
                skipped += 1;
                continue;
            }

            let Ok(accession) = Accession::new(value) else {
                debug!(line = line + 1, symbol, value, "Skipping mapping with malformed accession");
                skipped += 1;
                continue;
            };

            if is_accession(symbol) {
                debug!(symbol, "Symbol has accession shape and will never be looked up");
            }

            entries.entry(symbol.to_string()).or_insert(accession);
        }

        if skipped > 0 {
            debug!(skipped, "Ignored malformed symbol map lines");
        }

        Self { entries }
    }

    /// Read and parse a symbol map file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CliError::symbol_map(format!("{}: {}", path.display(), e)))?;
        Ok(Self::parse(&text))
    }

    /// The symbol map bundled with the binary
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_SYMBOL_MAP)
    }

    /// Load from `path`, or fall back to the bundled map
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let map = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::bundled(),
        };
        info!(entries = map.len(), source = ?path, "Gene symbol map loaded");
        Ok(map)
    }

    /// The process-wide table, loaded on first use
    ///
    /// Only the first successful call's `config` is used; later calls share
    /// the already loaded table.
    pub async fn global(config: &Config) -> Result<&'static SymbolMap> {
        GLOBAL_SYMBOLS
            .get_or_try_init(|| Self::load(config.symbol_map.as_deref()))
            .await
    }

    pub fn get(&self, symbol: &str) -> Option<&Accession> {
        self.entries.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Symbols within a small edit distance of `query`, closest first
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<&str> {
        let mut scored: Vec<(usize, &str)> = self
            .entries
            .keys()
            .map(|symbol| (strsim::levenshtein(query, symbol), symbol.as_str()))
            .filter(|(distance, _)| *distance > 0 && *distance <= 2)
            .collect();

        scored.sort();
        scored.into_iter().take(limit).map(|(_, s)| s).collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Accession)> for SymbolMap {
    fn from_iter<I: IntoIterator<Item = (S, Accession)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(s, a)| (s.into(), a)).collect(),
        }
    }
}

/// Resolve a trimmed query against a loaded map
///
/// Accession-shaped queries are returned unchanged and the map is not
/// consulted.
pub fn resolve(query: &str, symbols: &SymbolMap) -> Result<Accession> {
    if is_accession(query) {
        return Ok(Accession::new(query)?);
    }

    symbols
        .get(query)
        .cloned()
        .ok_or_else(|| CliError::NoMapping(query.to_string()))
}

#[derive(Debug, Clone)]
enum SymbolSource {
    Global(Config),
    Fixed(Arc<SymbolMap>),
    File(PathBuf),
}

/// Resolves queries, loading the symbol map only when a lookup is needed
#[derive(Debug, Clone)]
pub struct Resolver {
    source: SymbolSource,
    file_map: Arc<OnceCell<SymbolMap>>,
}

impl Resolver {
    /// Use the process-wide symbol map
    pub fn global(config: &Config) -> Self {
        Self::with_source(SymbolSource::Global(config.clone()))
    }

    /// Use a specific, already loaded map
    pub fn with_map(map: SymbolMap) -> Self {
        Self::with_source(SymbolSource::Fixed(Arc::new(map)))
    }

    /// Use a map file owned by this resolver, loaded on first lookup
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self::with_source(SymbolSource::File(path.into()))
    }

    fn with_source(source: SymbolSource) -> Self {
        Self {
            source,
            file_map: Arc::new(OnceCell::new()),
        }
    }

    /// Wait until the symbol map is ready and return it
    pub async fn symbols(&self) -> Result<&SymbolMap> {
        match &self.source {
            SymbolSource::Global(config) => SymbolMap::global(config).await,
            SymbolSource::Fixed(map) => Ok(map.as_ref()),
            SymbolSource::File(path) => {
                self.file_map
                    .get_or_try_init(|| SymbolMap::load(Some(path.as_path())))
                    .await
            },
        }
    }

    /// Resolve a trimmed query
    pub async fn resolve(&self, query: &str) -> Result<Accession> {
        if is_accession(query) {
            debug!(query, "Query is already an accession");
            return Ok(Accession::new(query)?);
        }

        let symbols = self.symbols().await?;
        let accession = resolve(query, symbols)?;
        debug!(query, accession = %accession, "Resolved gene symbol");
        Ok(accession)
    }
}
