//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind, overriding the configured host
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding the configured port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Latest command arguments.
#[derive(Debug, Args)]
pub struct LatestCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Altitude in meters (0 to 3000)
    #[arg(long, allow_negative_numbers = true)]
    pub altitude: f64,

    /// Heading in degrees; wrapped into 0..360
    #[arg(long, allow_negative_numbers = true)]
    pub heading: f64,

    /// Attitude (-100 to 100)
    #[arg(long, allow_negative_numbers = true)]
    pub attitude: f64,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per reading
    #[default]
    Plain,
    /// Aligned columns with a header
    Table,
    /// JSON output
    Json,
}
