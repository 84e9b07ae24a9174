//! `protlens shell` command implementation
//!
//! Interactive search session. Each query replaces the previous result; a
//! structure picker switches the viewer between candidates.

use crate::api::types::StructureCandidate;
use crate::api::ApiClient;
use crate::commands::symbols::print_suggestions;
use crate::config::Config;
use crate::error::{CliError, ErrorKind, Result};
use crate::progress::LoadingOverlay;
use crate::render::terminal::render_viewer;
use crate::render::{render_view, ViewerPanel};
use crate::resolver::Resolver;
use crate::search::{SearchController, SearchState};
use crate::viewer::{CoordinateViewer, ViewerContainer};
use colored::Colorize;
use inquire::{InquireError, Select, Text};
use std::fmt;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use tracing::debug;

const QUIT: &str = ":q";

/// Entry in the structure picker
enum PickerChoice {
    Structure { identifier: String, label: String },
    NewSearch,
}

impl PickerChoice {
    fn from_candidate(candidate: &StructureCandidate) -> Self {
        let mut label = format!("{}  {}", candidate.identifier, candidate.category);
        if let Some(method) = &candidate.experimental_method {
            label.push_str(&format!("  {}", method));
        }
        PickerChoice::Structure {
            identifier: candidate.identifier.clone(),
            label,
        }
    }
}

impl fmt::Display for PickerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerChoice::Structure { label, .. } => f.write_str(label),
            PickerChoice::NewSearch => f.write_str("← New search"),
        }
    }
}

/// Run the interactive shell
pub async fn run(config: &Config) -> Result<()> {
    if !io::stdin().is_terminal() {
        return Err(CliError::config(
            "The interactive shell needs a terminal; use 'protlens search' instead",
        ));
    }

    let client = ApiClient::new(config)?;
    let controller = SearchController::new(client.clone(), Resolver::global(config));
    let mut container = ViewerContainer::new(Arc::new(CoordinateViewer::new(client.http().clone())));
    let hyperlinks = io::stdout().is_terminal();

    println!("{}", "ProtLens".bold().green());
    println!("Search by gene symbol or UniProt accession. Type {} to quit.", QUIT.cyan());
    println!();

    loop {
        let input = match Text::new("Search:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let query = input.trim();
        if query.is_empty() {
            continue;
        }
        if query == QUIT {
            break;
        }

        let overlay = LoadingOverlay::start(
            &format!("Searching for '{}'...", query),
            config.loading_trailing_delay(),
        );
        let generation = controller.submit(query).await;
        overlay.finish().await;
        debug!(generation, "Search finished");

        let view = controller.snapshot().await;

        if let SearchState::Error { kind, .. } = &view.state {
            container.dispose();
            println!("{}", render_view(&view, ViewerPanel::Empty, hyperlinks));
            if *kind == ErrorKind::Resolution {
                if let Ok(symbols) = controller.resolver().symbols().await {
                    print_suggestions(symbols, query);
                }
            }
            continue;
        }

        match &view.selected {
            Some(selected) => {
                container.mount(selected).await;
            },
            None => container.dispose(),
        }

        let panel = container
            .session()
            .map(ViewerPanel::Mounted)
            .unwrap_or(ViewerPanel::Empty);
        println!("{}", render_view(&view, panel, hyperlinks));

        if view.structures.len() > 1 {
            pick_structures(&controller, &mut container, &view.structures).await?;
        }
    }

    container.dispose();
    println!("Goodbye.");
    Ok(())
}

/// Let the user switch between candidates until they start a new search
async fn pick_structures(
    controller: &SearchController,
    container: &mut ViewerContainer,
    structures: &[StructureCandidate],
) -> Result<()> {
    loop {
        let mut choices: Vec<PickerChoice> =
            structures.iter().map(PickerChoice::from_candidate).collect();
        choices.push(PickerChoice::NewSearch);

        let choice = match Select::new("Structure:", choices).with_page_size(12).prompt_skippable() {
            Ok(choice) => choice,
            Err(InquireError::OperationInterrupted) => None,
            Err(e) => return Err(e.into()),
        };

        let Some(PickerChoice::Structure { identifier, .. }) = choice else {
            return Ok(());
        };

        let selected = controller.select(&identifier).await?;
        container.mount(&selected).await;

        let panel = container
            .session()
            .map(ViewerPanel::Mounted)
            .unwrap_or(ViewerPanel::Empty);
        println!("{}", render_viewer(Some(&selected), panel));
    }
}
