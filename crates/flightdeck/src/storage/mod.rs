//! Storage layer for flightdeck.
//!
//! This module provides the `SQLite`-backed telemetry store. The store is
//! append-only: readings are inserted once and listed newest-first, and
//! nothing updates or deletes them.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::reading::TelemetryReading;

use schema::READING_COLUMNS;

/// Persistent store of telemetry readings.
///
/// Every stored reading satisfies the field bounds in [`crate::reading`];
/// [`TelemetryStore::insert`] rejects anything else before touching the
/// database.
#[derive(Debug)]
pub struct TelemetryStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl TelemetryStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist
    /// and migrates the schema to the current version.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening telemetry database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&mut conn)?;

        info!("Telemetry database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&mut conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a reading, returning its assigned id.
    ///
    /// Any id already set on `reading` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConstraintViolation`] if a field is out of range, in
    /// which case nothing is written, or an error if the database operation
    /// fails.
    pub fn insert(&self, reading: &TelemetryReading) -> Result<i64> {
        if let Err(e) = reading.check_bounds() {
            warn!("Rejected telemetry reading: {e}");
            return Err(e);
        }

        self.conn.execute(
            r"
            INSERT INTO readings (altitude, heading, attitude, recorded_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                reading.altitude,
                reading.heading,
                reading.attitude,
                reading.recorded_at.to_rfc3339(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted telemetry reading with id {}", id);
        Ok(id)
    }

    /// Every stored reading, newest first.
    ///
    /// An empty store yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_all(&self) -> Result<Vec<TelemetryReading>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {READING_COLUMNS} FROM readings ORDER BY id DESC"))?;

        let readings = stmt
            .query_map([], Self::row_to_reading)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// The most recently inserted reading, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn latest(&self) -> Result<Option<TelemetryReading>> {
        let reading = self
            .conn
            .query_row(
                &format!("SELECT {READING_COLUMNS} FROM readings ORDER BY id DESC LIMIT 1"),
                [],
                Self::row_to_reading,
            )
            .optional()?;
        Ok(reading)
    }

    /// Count stored readings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a database row to a reading.
    fn row_to_reading(row: &rusqlite::Row) -> rusqlite::Result<TelemetryReading> {
        let id: i64 = row.get(0)?;
        let recorded_at_str: String = row.get(4)?;

        let recorded_at = DateTime::parse_from_rfc3339(&recorded_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                warn!("Unparsable timestamp {recorded_at_str:?} on reading {id}");
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
            })?;

        Ok(TelemetryReading {
            id: Some(id),
            altitude: row.get(1)?,
            heading: row.get(2)?,
            attitude: row.get(3)?,
            recorded_at,
        })
    }
}
