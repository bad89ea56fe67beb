//! Telemetry reading types for flightdeck.
//!
//! A reading is one sample of the three flight instruments: altimeter,
//! horizontal situation indicator (heading), and attitude director indicator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// Full turn in degrees; headings are reduced modulo this value.
pub const HEADING_PERIOD: f64 = 360.0;

/// Inclusive range a reading field must fall in to be stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    /// Wire name of the field.
    pub field: &'static str,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

/// Altitude in meters.
pub const ALTITUDE_BOUNDS: FieldBounds = FieldBounds {
    field: "Altitude",
    min: 0.0,
    max: 3000.0,
};

/// Heading in degrees. The store accepts the closed interval; submitted
/// headings are normalized into `[0, 360)` before they get here.
pub const HEADING_BOUNDS: FieldBounds = FieldBounds {
    field: "HIS",
    min: 0.0,
    max: HEADING_PERIOD,
};

/// Attitude indicator deflection.
pub const ATTITUDE_BOUNDS: FieldBounds = FieldBounds {
    field: "ADI",
    min: -100.0,
    max: 100.0,
};

impl FieldBounds {
    /// Check that `value` lies within these bounds.
    ///
    /// Non-finite values never pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConstraintViolation`] if the value is out of range.
    pub fn check(&self, value: f64) -> Result<()> {
        if (self.min..=self.max).contains(&value) {
            Ok(())
        } else {
            Err(Error::ConstraintViolation {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Reduce a heading into `[0, 360)`.
///
/// `360` becomes `0` and negative headings wrap around, so `-90` becomes `270`.
#[must_use]
pub fn normalize_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(HEADING_PERIOD);
    // rem_euclid can round up to the period for tiny negative inputs
    if wrapped >= HEADING_PERIOD {
        0.0
    } else {
        // clears negative zero
        wrapped.abs()
    }
}

/// A single flight-instrument telemetry reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TelemetryReading {
    /// Identifier assigned by the store on insert. Higher ids are newer.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(example = 42)]
    pub id: Option<i64>,

    /// Altitude in meters, `[0, 3000]`.
    #[serde(rename = "Altitude")]
    #[schema(example = 1200.0)]
    pub altitude: f64,

    /// Heading in degrees, `[0, 360)`.
    #[serde(rename = "HIS")]
    #[schema(example = 90.0)]
    pub heading: f64,

    /// Attitude, `[-100, 100]`.
    #[serde(rename = "ADI")]
    #[schema(example = -12.5)]
    pub attitude: f64,

    /// When the reading was stored.
    #[serde(rename = "timestamp")]
    #[schema(value_type = String, format = DateTime, example = "2026-10-19T12:00:00Z")]
    pub recorded_at: DateTime<Utc>,
}

impl TelemetryReading {
    /// Create a reading stamped with the current time.
    ///
    /// Values are taken as given; use [`normalize_heading`] first for raw
    /// instrument headings.
    #[must_use]
    pub fn new(altitude: f64, heading: f64, attitude: f64) -> Self {
        Self {
            id: None,
            altitude,
            heading,
            attitude,
            recorded_at: Utc::now(),
        }
    }

    /// Check every field against its bounds, reporting the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConstraintViolation`] for the first field out of range,
    /// checked in the order altitude, heading, attitude.
    pub fn check_bounds(&self) -> Result<()> {
        ALTITUDE_BOUNDS.check(self.altitude)?;
        HEADING_BOUNDS.check(self.heading)?;
        ATTITUDE_BOUNDS.check(self.attitude)
    }

    /// Eight-point compass label for the heading.
    #[must_use]
    pub fn compass_point(&self) -> &'static str {
        const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
        let sector = (normalize_heading(self.heading) + 22.5) / 45.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = sector.floor() as usize % POINTS.len();
        POINTS[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading_in_range_unchanged() {
        assert!((normalize_heading(0.0) - 0.0).abs() < f64::EPSILON);
        assert!((normalize_heading(90.0) - 90.0).abs() < f64::EPSILON);
        assert!((normalize_heading(359.5) - 359.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_heading_full_turn_is_zero() {
        assert!(normalize_heading(360.0).abs() < f64::EPSILON);
        assert!(normalize_heading(720.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_heading_wraps_large_values() {
        assert!((normalize_heading(450.0) - 90.0).abs() < 1e-9);
        assert!((normalize_heading(1_000_000.0) - 280.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_heading_wraps_negative_values() {
        assert!((normalize_heading(-90.0) - 270.0).abs() < 1e-9);
        assert!((normalize_heading(-360.0)).abs() < f64::EPSILON);
        assert!((normalize_heading(-450.0) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_heading_tiny_negative_stays_below_period() {
        let normalized = normalize_heading(-1e-20);
        assert!((0.0..HEADING_PERIOD).contains(&normalized));
    }

    #[test]
    fn test_normalize_heading_negative_zero() {
        let normalized = normalize_heading(-0.0);
        assert!(normalized.is_sign_positive());
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(ALTITUDE_BOUNDS.check(0.0).is_ok());
        assert!(ALTITUDE_BOUNDS.check(3000.0).is_ok());
        assert!(HEADING_BOUNDS.check(360.0).is_ok());
        assert!(ATTITUDE_BOUNDS.check(-100.0).is_ok());
        assert!(ATTITUDE_BOUNDS.check(100.0).is_ok());
    }

    #[test]
    fn test_bounds_reject_out_of_range() {
        assert!(ALTITUDE_BOUNDS.check(-0.1).is_err());
        assert!(ALTITUDE_BOUNDS.check(3000.1).is_err());
        assert!(HEADING_BOUNDS.check(360.5).is_err());
        assert!(ATTITUDE_BOUNDS.check(-101.0).is_err());
    }

    #[test]
    fn test_bounds_reject_non_finite() {
        assert!(ALTITUDE_BOUNDS.check(f64::NAN).is_err());
        assert!(ATTITUDE_BOUNDS.check(f64::INFINITY).is_err());
        assert!(HEADING_BOUNDS.check(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_check_bounds_reports_first_failure() {
        let reading = TelemetryReading::new(5000.0, 10.0, 500.0);
        let err = reading.check_bounds().unwrap_err();
        match err {
            Error::ConstraintViolation { field, .. } => assert_eq!(field, "Altitude"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_bounds_attitude() {
        let reading = TelemetryReading::new(100.0, 10.0, 150.0);
        let err = reading.check_bounds().unwrap_err();
        assert!(err.to_string().contains("ADI"));
    }

    #[test]
    fn test_new_has_no_id() {
        let reading = TelemetryReading::new(100.0, 45.0, 0.0);
        assert!(reading.id.is_none());
        assert!(reading.check_bounds().is_ok());
    }

    #[test]
    fn test_serialize_wire_names() {
        let mut reading = TelemetryReading::new(1200.0, 90.0, -12.5);
        reading.id = Some(7);
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["Altitude"], 1200.0);
        assert_eq!(json["HIS"], 90.0);
        assert_eq!(json["ADI"], -12.5);
        assert!(json["timestamp"].is_string());
        assert!(json.get("altitude").is_none());
    }

    #[test]
    fn test_serialize_skips_missing_id() {
        let reading = TelemetryReading::new(1.0, 2.0, 3.0);
        let json = serde_json::to_string(&reading).unwrap();
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_compass_point() {
        let at = |heading| TelemetryReading::new(0.0, heading, 0.0).compass_point();
        assert_eq!(at(0.0), "N");
        assert_eq!(at(22.4), "N");
        assert_eq!(at(22.5), "NE");
        assert_eq!(at(90.0), "E");
        assert_eq!(at(180.0), "S");
        assert_eq!(at(270.0), "W");
        assert_eq!(at(337.6), "N");
        assert_eq!(at(359.9), "N");
    }
}
