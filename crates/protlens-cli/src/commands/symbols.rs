//! `protlens symbols` command implementation
//!
//! Resolves a query to an accession without fetching anything.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::resolver::{Resolver, SymbolMap};
use colored::Colorize;
use tracing::debug;

/// Suggestions offered for an unmapped symbol
pub const MAX_SUGGESTIONS: usize = 3;

/// Resolve and print the accession
pub async fn run(config: &Config, query: &str) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::config("Query cannot be empty"));
    }

    let resolver = Resolver::global(config);
    match resolver.resolve(query).await {
        Ok(accession) => {
            debug!(query, accession = %accession, "Resolved");
            println!("{}", accession);
            Ok(())
        },
        Err(e @ CliError::NoMapping(_)) => {
            let symbols = resolver.symbols().await?;
            print_suggestions(symbols, query);
            Err(e)
        },
        Err(e) => Err(e),
    }
}

/// Print "did you mean" hints for an unmapped symbol to stderr
pub fn print_suggestions(symbols: &SymbolMap, query: &str) {
    let suggestions = symbols.suggestions(query, MAX_SUGGESTIONS);
    if suggestions.is_empty() {
        return;
    }

    eprintln!("{}", "Did you mean:".bold());
    for suggestion in suggestions {
        eprintln!("  {} {}", "•".blue(), suggestion);
    }
    eprintln!();
}
