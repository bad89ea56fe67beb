//! `flightdeck` - Flight-instrument telemetry recorder
//!
//! This library provides ingest, storage, and display of altitude, heading,
//! and attitude readings: a validating service over a `SQLite` store, an HTTP
//! API in front of it, and text rendering for the command line.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod reading;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use reading::{normalize_heading, TelemetryReading};
pub use service::{ServiceError, TelemetryPayload, TelemetryService};
pub use storage::TelemetryStore;
