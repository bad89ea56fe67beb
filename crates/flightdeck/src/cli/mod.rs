//! Command-line interface for flightdeck.
//!
//! This module provides the CLI structure for the `flightdeck` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, LatestCommand, ListCommand, OutputFormat, ServeCommand, SubmitCommand,
};

/// flightdeck - Flight-instrument telemetry recorder
///
/// Accepts altitude, heading, and attitude readings over HTTP, stores them,
/// and shows the latest ones.
#[derive(Debug, Parser)]
#[command(name = "flightdeck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the telemetry HTTP API
    Serve(ServeCommand),

    /// Print every stored reading, newest first
    List(ListCommand),

    /// Print the most recent reading
    Latest(LatestCommand),

    /// Store a reading
    Submit(SubmitCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
