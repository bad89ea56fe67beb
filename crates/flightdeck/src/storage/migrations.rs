//! Schema versioning for the telemetry store.
//!
//! Migrations are listed in [`MIGRATIONS`] in ascending version order. On open
//! the store applies every migration newer than the version recorded in the
//! `metadata` table, each inside its own transaction.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::{CREATE_METADATA_TABLE, CREATE_READINGS_TABLE};

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// One forward schema step.
#[derive(Debug)]
pub struct Migration {
    /// Version the schema is at after this migration.
    pub version: i32,
    /// Short human-readable summary, used in logs.
    pub description: &'static str,
    /// Statements to execute, in order.
    pub statements: &'static [&'static str],
}

/// Every migration, oldest first.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "create readings table",
    statements: &[CREATE_READINGS_TABLE],
}];

/// The schema version a fully migrated store is at.
#[must_use]
pub fn current_version() -> i32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Bring the schema up to [`current_version`].
///
/// # Errors
///
/// Returns an error if the stored version is unreadable, is newer than this
/// build knows about, or a migration statement fails.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let stored = schema_version(conn)?;
    let target = current_version();
    if stored > target {
        return Err(Error::DatabaseMigration {
            message: format!("database schema version {stored} is newer than supported version {target}"),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > stored) {
        apply(conn, migration)?;
    }

    Ok(())
}

/// Read the recorded schema version; 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn apply(conn: &mut Connection, migration: &Migration) -> Result<()> {
    debug!(
        "Applying migration {}: {}",
        migration.version, migration.description
    );

    let tx = conn.transaction()?;
    for statement in migration.statements {
        tx.execute(statement, [])
            .map_err(|e| Error::DatabaseMigration {
                message: format!("migration {} failed: {e}", migration.version),
            })?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, migration.version.to_string()),
    )?;
    tx.commit()?;

    info!("Database schema migrated to version {}", migration.version);
    Ok(())
}
