//! `flightdeck` - CLI for the flight-instrument telemetry recorder
//!
//! Runs the HTTP API and offers local access to the same telemetry store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use flightdeck::cli::{Cli, Command, ConfigCommand, ServeCommand, SubmitCommand};
use flightdeck::display::{render_reading, render_readings};
use flightdeck::{api, init_logging, Config, TelemetryPayload, TelemetryService, TelemetryStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Validating a file must not depend on the active configuration loading.
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, &serve_cmd),
        Command::List(list_cmd) => {
            let readings = open_service(&config)?.list()?;
            println!("{}", render_readings(&readings, list_cmd.format)?);
            Ok(())
        }
        Command::Latest(latest_cmd) => {
            let latest = open_service(&config)?.latest()?;
            println!("{}", render_reading(latest.as_ref(), latest_cmd.format)?);
            Ok(())
        }
        Command::Submit(submit_cmd) => handle_submit(&config, &submit_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_service(config: &Config) -> anyhow::Result<TelemetryService> {
    let path = config.database_path();
    let store = TelemetryStore::open(&path)
        .with_context(|| format!("opening telemetry store at {}", path.display()))?;
    Ok(TelemetryService::new(store))
}

fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = &cmd.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    let service = Arc::new(open_service(&config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(api::run(&config, service))?;
    Ok(())
}

fn handle_submit(config: &Config, cmd: &SubmitCommand) -> anyhow::Result<()> {
    let service = open_service(config)?;
    let payload = TelemetryPayload::from_values(cmd.altitude, cmd.heading, cmd.attitude);
    let id = service.submit(&payload)?;
    println!("Stored reading #{id}");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => return handle_validate(file),
    }
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) -> anyhow::Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    Config::validate_file(&path)
        .with_context(|| format!("configuration {} is invalid", path.display()))?;
    println!("Configuration is valid.");
    Ok(())
}
