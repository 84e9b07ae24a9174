//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod config;
pub mod search;
pub mod shell;
pub mod structures;
pub mod symbols;
