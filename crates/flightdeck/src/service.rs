//! Telemetry service.
//!
//! The service is the only way readings enter or leave the store. It checks
//! the payload shape, normalizes the heading, and turns every store failure
//! into a [`ServiceError::Persistence`] carrying the store's message.

use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::reading::{normalize_heading, TelemetryReading};
use crate::storage::TelemetryStore;

/// Body returned for any payload that is not three numbers.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input: all fields must be numbers";

/// Errors reported by [`TelemetryService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A field was missing or not a number. Nothing was written.
    #[error("{}", INVALID_INPUT_MESSAGE)]
    Validation {
        /// Wire name of the first offending field.
        field: &'static str,
    },

    /// The store rejected the reading or failed. Nothing was written.
    #[error("{0}")]
    Persistence(String),
}

impl ServiceError {
    pub(crate) fn persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Incoming reading as submitted by a client.
///
/// Fields are kept as raw JSON values so that a wrong type is reported as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TelemetryPayload {
    /// Altitude in meters, `[0, 3000]`.
    #[serde(rename = "Altitude", default)]
    #[schema(value_type = f64, example = 1200.0)]
    pub altitude: Option<Value>,

    /// Heading in degrees; any real value, reduced modulo 360.
    #[serde(rename = "HIS", default)]
    #[schema(value_type = f64, example = 450.0)]
    pub heading: Option<Value>,

    /// Attitude, `[-100, 100]`.
    #[serde(rename = "ADI", default)]
    #[schema(value_type = f64, example = -12.5)]
    pub attitude: Option<Value>,
}

impl TelemetryPayload {
    /// Read a payload out of a JSON document.
    ///
    /// Only objects are accepted; an array such as `[1, 2, 3]` is not read
    /// positionally.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the document is not an object.
    pub fn from_json(document: Value) -> Result<Self, ServiceError> {
        if !document.is_object() {
            return Err(ServiceError::Validation { field: "body" });
        }
        serde_json::from_value(document).map_err(|_| ServiceError::Validation { field: "body" })
    }

    /// Build a payload from three numbers.
    ///
    /// Non-finite numbers have no JSON form and become `null`, which the
    /// service rejects.
    #[must_use]
    pub fn from_values(altitude: f64, heading: f64, attitude: f64) -> Self {
        Self {
            altitude: Some(Value::from(altitude)),
            heading: Some(Value::from(heading)),
            attitude: Some(Value::from(attitude)),
        }
    }
}

/// Submit and list operations over an owned [`TelemetryStore`].
///
/// Calls block on the store; async callers should run them on a blocking
/// thread.
#[derive(Debug)]
pub struct TelemetryService {
    store: Mutex<TelemetryStore>,
}

impl TelemetryService {
    /// Create a service that owns `store`.
    #[must_use]
    pub fn new(store: TelemetryStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Validate, normalize, and persist a reading, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if any field is missing or not a
    /// number, and [`ServiceError::Persistence`] if the store refuses the
    /// reading.
    pub fn submit(&self, payload: &TelemetryPayload) -> Result<i64, ServiceError> {
        let altitude = numeric_field(payload.altitude.as_ref(), "Altitude")?;
        let heading = numeric_field(payload.heading.as_ref(), "HIS")?;
        let attitude = numeric_field(payload.attitude.as_ref(), "ADI")?;

        let reading = TelemetryReading::new(altitude, normalize_heading(heading), attitude);
        let id = self
            .store()?
            .insert(&reading)
            .map_err(ServiceError::persistence)?;

        debug!(id, heading = reading.heading, "Telemetry reading stored");
        Ok(id)
    }

    /// Every stored reading, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Persistence`] if the store query fails.
    pub fn list(&self) -> Result<Vec<TelemetryReading>, ServiceError> {
        self.store()?.list_all().map_err(ServiceError::persistence)
    }

    /// The newest reading, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Persistence`] if the store query fails.
    pub fn latest(&self) -> Result<Option<TelemetryReading>, ServiceError> {
        self.store()?.latest().map_err(ServiceError::persistence)
    }

    fn store(&self) -> Result<MutexGuard<'_, TelemetryStore>, ServiceError> {
        self.store.lock().map_err(|_| {
            warn!("Telemetry store lock poisoned");
            ServiceError::Persistence("telemetry store is unavailable".to_string())
        })
    }
}

fn numeric_field(value: Option<&Value>, field: &'static str) -> Result<f64, ServiceError> {
    value
        .and_then(Value::as_f64)
        .ok_or(ServiceError::Validation { field })
}
