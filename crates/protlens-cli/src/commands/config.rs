//! `protlens config` command implementation
//!
//! Shows the effective configuration.

use crate::config::Config;
use crate::error::{CliError, Result};
use colored::Colorize;

/// Get configuration value
pub async fn get(config: &Config, key: &str) -> Result<()> {
    match config.get(key) {
        Some(value) => println!("{}", value),
        None => {
            return Err(CliError::config(format!(
                "Unknown config key: {}. Known keys: {}",
                key,
                Config::keys().join(", ")
            )));
        },
    }

    Ok(())
}

/// Show all configuration
pub async fn show(config: &Config) -> Result<()> {
    println!("{}", "ProtLens Configuration:".cyan().bold());
    println!();
    for key in Config::keys() {
        let value = config.get(key).unwrap_or_default();
        println!("{:<22} {}", format!("{}:", key), value);
    }
    println!();
    println!("{}", "Environment Variables:".cyan());
    for key in Config::keys() {
        println!("  {}", format_env_var(key));
    }
    println!();
    println!("Set them in the environment or in a .env file in the working directory.");

    Ok(())
}

/// Format config key as environment variable name
fn format_env_var(key: &str) -> String {
    format!("PROTLENS_{}", key.to_uppercase())
}
