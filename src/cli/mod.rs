//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for classroll using clap.
//!
//! Exit codes: `0` success, `1` no data for the criteria, `2` configuration
//! or validation error, `3` caller is not a teacher, `4` a store is
//! unreachable, `5` fatal error.

pub mod commands;

use clap::{Parser, Subcommand};

/// Classroll - teacher portal reporting service
#[derive(Parser, Debug)]
#[command(name = "classroll")]
#[command(version, about, long_about = None)]
#[command(author = "Classroll Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "classroll.toml", env = "CLASSROLL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CLASSROLL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (dashboard, report JSON and export downloads)
    Serve(commands::serve::ServeArgs),

    /// Build one report and write it to a file
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
