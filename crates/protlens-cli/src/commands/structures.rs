//! `protlens structures` command implementation
//!
//! Lists the 3D models available for a protein.

use crate::api::ApiClient;
use crate::commands::symbols::print_suggestions;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::render::terminal::render_structures;
use crate::resolver::Resolver;
use crate::viewer::SelectedStructure;
use crate::OutputFormat;

/// List structure candidates
pub async fn run(config: &Config, query: &str, format: OutputFormat) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::config("Search query cannot be empty"));
    }

    let resolver = Resolver::global(config);
    let accession = match resolver.resolve(query).await {
        Ok(accession) => accession,
        Err(e @ CliError::NoMapping(_)) => {
            if let Ok(symbols) = resolver.symbols().await {
                print_suggestions(symbols, query);
            }
            return Err(e);
        },
        Err(e) => return Err(e),
    };

    let client = ApiClient::new(config)?;
    let structures = client.fetch_structures(&accession).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&structures)?),
        OutputFormat::Text => {
            let selected = structures.first().map(SelectedStructure::from);
            print!(
                "{}",
                render_structures(accession.as_str(), &structures, selected.as_ref())
            );
        },
    }

    Ok(())
}
