//! Search command implementation
//!
//! One-shot lookup of a protein by gene symbol or UniProt accession.

use crate::api::types::{ProteinRecord, StructureCandidate};
use crate::api::ApiClient;
use crate::commands::symbols::print_suggestions;
use crate::config::Config;
use crate::error::{CliError, ErrorKind, Result};
use crate::progress::LoadingOverlay;
use crate::render::{render_page, render_view, ViewerPanel};
use crate::resolver::Resolver;
use crate::search::{SearchController, SearchState, ViewState};
use crate::viewer::{CoordinateViewer, Scene, SelectedStructure, ViewerContainer};
use crate::OutputFormat;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Options of `protlens search`
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub query: Vec<String>,
    pub format: OutputFormat,
    pub structure: Option<String>,
    pub no_viewer: bool,
    pub html: Option<PathBuf>,
    pub open: bool,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    record: &'a ProteinRecord,
    structures: &'a [StructureCandidate],
    selected: Option<&'a SelectedStructure>,
    scene: Option<&'a Scene>,
}

/// Run the search command
pub async fn run(config: &Config, options: SearchOptions) -> Result<()> {
    // Join query terms with spaces
    let query = options.query.join(" ");
    let query = query.trim();

    if query.is_empty() {
        return Err(CliError::config("Search query cannot be empty"));
    }

    debug!(query, format = ?options.format, "Starting search");

    let client = ApiClient::new(config)?;
    let controller = SearchController::new(client.clone(), Resolver::global(config));

    let overlay = LoadingOverlay::start(
        &format!("Searching for '{}'...", query),
        config.loading_trailing_delay(),
    );
    controller.submit(query).await;
    overlay.finish().await;

    let mut view = controller.snapshot().await;

    if let SearchState::Error { message, kind } = &view.state {
        if *kind == ErrorKind::Resolution {
            if let Ok(symbols) = controller.resolver().symbols().await {
                print_suggestions(symbols, query);
            }
        }
        return Err(CliError::SearchFailed(message.clone()));
    }

    if let Some(identifier) = &options.structure {
        controller.select(identifier).await?;
        view = controller.snapshot().await;
    }

    let Some(record) = view.record.clone() else {
        return Err(CliError::SearchFailed(format!("No data returned for '{}'", query)));
    };

    info!(accession = %record.accession, structures = view.structures.len(), "Search complete");

    let mut container = ViewerContainer::new(Arc::new(CoordinateViewer::new(client.http().clone())));
    if !options.no_viewer {
        if let Some(selected) = &view.selected {
            let overlay = LoadingOverlay::start(
                &format!("Loading structure {}...", selected.identifier),
                config.loading_trailing_delay(),
            );
            container.mount(selected).await;
            overlay.finish().await;
        }
    }

    match options.format {
        OutputFormat::Json => display_json(&record, &view, &container)?,
        OutputFormat::Text => {
            let panel = if options.no_viewer {
                ViewerPanel::Disabled
            } else {
                container
                    .session()
                    .map(ViewerPanel::Mounted)
                    .unwrap_or(ViewerPanel::Empty)
            };
            print!("{}", render_view(&view, panel, io::stdout().is_terminal()));
        },
    }

    if let Some(path) = &options.html {
        write_html(&record, &view, &container, path).await?;
        if options.open {
            if let Err(e) = open::that(path) {
                warn!(error = %e, path = %path.display(), "Failed to open browser");
                eprintln!("{} Could not open {}: {}", "⚠".yellow(), path.display(), e);
            }
        }
    }

    container.dispose();
    Ok(())
}

/// Display the record and candidates as JSON
fn display_json(record: &ProteinRecord, view: &ViewState, container: &ViewerContainer) -> Result<()> {
    let output = SearchOutput {
        record,
        structures: &view.structures,
        selected: view.selected.as_ref(),
        scene: container.session().map(|s| s.scene()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn write_html(
    record: &ProteinRecord,
    view: &ViewState,
    container: &ViewerContainer,
    path: &Path,
) -> Result<()> {
    let html = render_page(record, view, container.session())?;
    tokio::fs::write(path, html).await?;
    eprintln!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
