//! `SQLite` schema definitions for the telemetry store.

/// Key-value table holding store metadata such as the schema version.
///
/// Created unconditionally before migrations run, since migrations record
/// their progress here.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Readings table.
///
/// `AUTOINCREMENT` keeps ids strictly increasing and never reused, which is
/// what newest-first listing orders by. The `CHECK` clauses mirror the field
/// bounds in [`crate::reading`].
pub const CREATE_READINGS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS readings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    altitude REAL NOT NULL CHECK (altitude >= 0 AND altitude <= 3000),
    heading REAL NOT NULL CHECK (heading >= 0 AND heading <= 360),
    attitude REAL NOT NULL CHECK (attitude >= -100 AND attitude <= 100),
    recorded_at TEXT NOT NULL
)
";

/// Columns selected when loading readings, in `row_to_reading` order.
pub const READING_COLUMNS: &str = "id, altitude, heading, attitude, recorded_at";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_table_has_bound_checks() {
        assert!(CREATE_READINGS_TABLE.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(CREATE_READINGS_TABLE.contains("altitude <= 3000"));
        assert!(CREATE_READINGS_TABLE.contains("heading <= 360"));
        assert!(CREATE_READINGS_TABLE.contains("attitude >= -100"));
    }

    #[test]
    fn test_reading_columns_order() {
        let columns: Vec<&str> = READING_COLUMNS.split(", ").collect();
        assert_eq!(
            columns,
            ["id", "altitude", "heading", "attitude", "recorded_at"]
        );
    }
}
