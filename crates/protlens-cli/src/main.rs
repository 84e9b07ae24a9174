//! ProtLens CLI - Main entry point

use clap::Parser;
use protlens_cli::commands::search::SearchOptions;
use protlens_cli::config::Config;
use protlens_cli::{Cli, Commands, ConfigCommand};
use protlens_common::logging::{init_logging, LogConfig};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // Ensure a command is provided
    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    // LOG_* environment variables take precedence over --verbose
    let log_config = LogConfig::for_cli(cli.verbose);
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // Initialize logging (ignore errors as CLI should work without logging)
    let _ = init_logging(&log_config);

    // Execute command
    let result = execute_command(&cli).await;

    // Handle result
    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> protlens_cli::Result<()> {
    let Some(ref command) = cli.command else {
        return Ok(());
    };

    let config = Config::from_env()?
        .with_overrides(cli.uniprot_url.as_deref(), cli.structures_url.as_deref())?;

    match command {
        Commands::Search {
            query,
            format,
            structure,
            no_viewer,
            html,
            open,
        } => {
            protlens_cli::commands::search::run(
                &config,
                SearchOptions {
                    query: query.clone(),
                    format: *format,
                    structure: structure.clone(),
                    no_viewer: *no_viewer,
                    html: html.clone(),
                    open: *open,
                },
            )
            .await
        },

        Commands::Shell => protlens_cli::commands::shell::run(&config).await,

        Commands::Structures { query, format } => {
            protlens_cli::commands::structures::run(&config, query, *format).await
        },

        Commands::Symbols { query } => protlens_cli::commands::symbols::run(&config, query).await,

        Commands::Config { command } => match command {
            ConfigCommand::Get { key } => protlens_cli::commands::config::get(&config, key).await,
            ConfigCommand::Show => protlens_cli::commands::config::show(&config).await,
        },
    }
}
