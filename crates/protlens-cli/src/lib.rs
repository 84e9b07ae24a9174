//! ProtLens CLI Library
//!
//! Look up a protein by gene symbol or UniProt accession and see what is
//! known about it.
//!
//! # Overview
//!
//! - **Resolution**: gene symbols map to accessions through a bundled table (`protlens symbols`)
//! - **Annotation**: function, subunit and recent literature from UniProtKB (`protlens search`)
//! - **Structures**: experimental and predicted models from 3D-Beacons (`protlens structures`)
//! - **Viewer**: the selected model is downloaded and summarized in the terminal
//! - **Interactive**: a prompt loop with a structure picker (`protlens shell`)
//! - **Configuration**: effective settings (`protlens config`)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod links;
pub mod progress;
pub mod render;
pub mod resolver;
pub mod search;
pub mod viewer;

// Re-export commonly used types
pub use error::{CliError, Result};
pub use resolver::{Resolver, SymbolMap};
pub use search::{SearchController, SearchState, ViewState};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ProtLens - protein lookup by gene symbol or UniProt accession
#[derive(Parser, Debug)]
#[command(name = "protlens")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// UniProtKB REST base URL
    #[arg(long, env = "PROTLENS_UNIPROT_URL", global = true)]
    pub uniprot_url: Option<String>,

    /// 3D-Beacons structure summary base URL
    #[arg(long, env = "PROTLENS_STRUCTURES_URL", global = true)]
    pub structures_url: Option<String>,

    /// Print the CLI reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Output format for result commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable panels and tables
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for a protein and show its annotation and structures
    Search {
        /// Gene symbol (e.g., "INS") or UniProt accession (e.g., "P01308")
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Show this structure instead of the first candidate
        #[arg(short, long)]
        structure: Option<String>,

        /// Do not download the selected structure
        #[arg(long)]
        no_viewer: bool,

        /// Also write the result as a standalone HTML page
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,

        /// Open the HTML page in the browser (requires --html)
        #[arg(long, requires = "html")]
        open: bool,
    },

    /// Interactive search session
    Shell,

    /// List the 3D models available for a protein
    Structures {
        /// Gene symbol or UniProt accession
        query: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Resolve a gene symbol to its UniProt accession
    #[command(alias = "resolve")]
    Symbols {
        /// Gene symbol or UniProt accession
        query: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show all configuration
    Show,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "protlens", "search", "insulin", "receptor", "--format", "json", "--no-viewer",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Search { query, format, no_viewer, .. }) => {
                assert_eq!(query, vec!["insulin", "receptor"]);
                assert_eq!(format, OutputFormat::Json);
                assert!(no_viewer);
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_open_requires_html() {
        assert!(Cli::try_parse_from(["protlens", "search", "INS", "--open"]).is_err());
    }

    #[test]
    fn test_resolve_alias() {
        let cli = Cli::try_parse_from(["protlens", "resolve", "TP53"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Symbols { .. })));
    }
}
