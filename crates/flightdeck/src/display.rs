//! Text rendering of telemetry readings.
//!
//! Plain output is one line per reading, table output aligns columns under a
//! header, and JSON output matches what `GET /api/telemetry` returns.

use std::fmt::Write as _;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::reading::TelemetryReading;

/// Printed instead of an empty listing.
pub const NO_READINGS: &str = "No telemetry readings recorded.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render a list of readings in the given format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_readings(readings: &[TelemetryReading], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(readings)?),
        _ if readings.is_empty() => Ok(NO_READINGS.to_string()),
        OutputFormat::Plain => Ok(readings
            .iter()
            .map(plain_line)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Table => Ok(table(readings)),
    }
}

/// Render a single reading, or the empty notice when there is none.
///
/// JSON output for a missing reading is `null`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_reading(reading: Option<&TelemetryReading>, format: OutputFormat) -> Result<String> {
    match (reading, format) {
        (reading, OutputFormat::Json) => Ok(serde_json::to_string_pretty(&reading)?),
        (None, _) => Ok(NO_READINGS.to_string()),
        (Some(reading), OutputFormat::Plain) => Ok(plain_line(reading)),
        (Some(reading), OutputFormat::Table) => Ok(table(std::slice::from_ref(reading))),
    }
}

fn id_label(reading: &TelemetryReading) -> String {
    reading
        .id
        .map_or_else(|| "-".to_string(), |id| format!("#{id}"))
}

fn plain_line(reading: &TelemetryReading) -> String {
    format!(
        "{} {}  ALT {:.1} m  HDG {:05.1}° {}  ATT {:+.1}",
        id_label(reading),
        reading.recorded_at.format(TIMESTAMP_FORMAT),
        reading.altitude,
        reading.heading,
        reading.compass_point(),
        reading.attitude,
    )
}

fn table(readings: &[TelemetryReading]) -> String {
    let rows: Vec<[String; 5]> = readings
        .iter()
        .map(|r| {
            [
                id_label(r),
                r.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
                format!("{:.1}", r.altitude),
                format!("{:.1} {}", r.heading, r.compass_point()),
                format!("{:+.1}", r.attitude),
            ]
        })
        .collect();

    let header = ["ID", "RECORDED", "ALTITUDE (m)", "HEADING", "ATTITUDE"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            // text columns left-aligned, numbers right-aligned
            if i < 2 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(id: i64, altitude: f64, heading: f64, attitude: f64) -> TelemetryReading {
        TelemetryReading {
            id: Some(id),
            altitude,
            heading,
            attitude,
            recorded_at: Utc.with_ymd_and_hms(2026, 10, 19, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_plain_line() {
        let out = render_readings(&[reading(3, 1200.0, 90.0, -12.5)], OutputFormat::Plain).unwrap();
        assert_eq!(
            out,
            "#3 2026-10-19 12:30:00 UTC  ALT 1200.0 m  HDG 090.0° E  ATT -12.5"
        );
    }

    #[test]
    fn test_plain_keeps_order() {
        let readings = [reading(2, 2.0, 0.0, 0.0), reading(1, 1.0, 0.0, 0.0)];
        let out = render_readings(&readings, OutputFormat::Plain).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#2"));
        assert!(lines[1].starts_with("#1"));
    }

    #[test]
    fn test_empty_readings() {
        assert_eq!(
            render_readings(&[], OutputFormat::Plain).unwrap(),
            NO_READINGS
        );
        assert_eq!(
            render_readings(&[], OutputFormat::Table).unwrap(),
            NO_READINGS
        );
        assert_eq!(render_readings(&[], OutputFormat::Json).unwrap(), "[]");
    }

    #[test]
    fn test_table_alignment() {
        let readings = [
            reading(10, 2500.0, 270.0, 5.0),
            reading(9, 0.0, 0.0, -100.0),
        ];
        let out = render_readings(&readings, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].contains("2500.0"));
        assert!(lines[2].contains("270.0 W"));
        assert!(lines[3].contains("-100.0"));
        // right-aligned attitude column ends at the same offset
        assert_eq!(
            lines[2].chars().count(),
            lines[3].chars().count()
        );
    }

    #[test]
    fn test_json_matches_wire_format() {
        let out = render_readings(&[reading(1, 100.0, 0.0, 0.0)], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["Altitude"], 100.0);
        assert_eq!(value[0]["HIS"], 0.0);
    }

    #[test]
    fn test_render_single_reading() {
        let r = reading(5, 10.0, 45.0, 1.0);
        let plain = render_reading(Some(&r), OutputFormat::Plain).unwrap();
        assert!(plain.contains("HDG 045.0° NE"));

        let table = render_reading(Some(&r), OutputFormat::Table).unwrap();
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn test_render_missing_reading() {
        assert_eq!(
            render_reading(None, OutputFormat::Plain).unwrap(),
            NO_READINGS
        );
        assert_eq!(render_reading(None, OutputFormat::Json).unwrap(), "null");
    }

    #[test]
    fn test_unsaved_reading_has_dash_id() {
        let mut r = reading(1, 1.0, 1.0, 1.0);
        r.id = None;
        let out = render_reading(Some(&r), OutputFormat::Plain).unwrap();
        assert!(out.starts_with("- "));
    }
}
