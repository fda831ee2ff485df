//! Conversion of catalog `created` values to ISO-8601 strings.
//!
//! The catalog reports creation times as milliseconds since the Unix epoch.
//! Summaries carry them as ISO-8601 date-times without an offset, with
//! microsecond precision:
//!
//! - `1970-01-01T00:00:01` when there is no sub-second part
//! - `1970-01-01T00:00:01.500000` otherwise

use chrono::{DateTime, Datelike, Local, NaiveDateTime, Utc};

use crate::error::{HubError, Result};

const MICROS_PER_SEC: i64 = 1_000_000;

/// Time zone in which `created` timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneMode {
    /// Coordinated Universal Time. Output does not depend on the host.
    #[default]
    Utc,
    /// The time zone of the host running the service.
    Local,
}

impl TimeZoneMode {
    /// Parse a mode name (`utc` or `local`, case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "utc" => Some(TimeZoneMode::Utc),
            "local" => Some(TimeZoneMode::Local),
            _ => None,
        }
    }
}

/// Convert milliseconds since the epoch to an ISO-8601 string.
///
/// Fractional milliseconds are kept down to the microsecond.
///
/// # Errors
///
/// Returns [`HubError::TimestampOutOfRange`] if `millis` is not finite or
/// lies outside the years 1 to 9999 once rendered in `zone`.
pub fn millis_to_iso(millis: f64, zone: TimeZoneMode) -> Result<String> {
    let out_of_range = || HubError::TimestampOutOfRange { millis };

    let micros = (millis * 1000.0).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    let micros = micros as i64;

    let secs = micros.div_euclid(MICROS_PER_SEC);
    let sub_micros = micros.rem_euclid(MICROS_PER_SEC);
    let utc = DateTime::<Utc>::from_timestamp(secs, (sub_micros * 1000) as u32)
        .ok_or_else(out_of_range)?;

    let naive: NaiveDateTime = match zone {
        TimeZoneMode::Utc => utc.naive_utc(),
        TimeZoneMode::Local => utc.with_timezone(&Local).naive_local(),
    };
    if !(1..=9999).contains(&naive.year()) {
        return Err(out_of_range());
    }

    let formatted = if sub_micros == 0 {
        naive.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        naive.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    };
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(
            millis_to_iso(0.0, TimeZoneMode::Utc).unwrap(),
            "1970-01-01T00:00:00"
        );
        assert_eq!(
            millis_to_iso(1000.0, TimeZoneMode::Utc).unwrap(),
            "1970-01-01T00:00:01"
        );
    }

    #[test]
    fn test_sub_second() {
        assert_eq!(
            millis_to_iso(1500.0, TimeZoneMode::Utc).unwrap(),
            "1970-01-01T00:00:01.500000"
        );
        assert_eq!(
            millis_to_iso(0.25, TimeZoneMode::Utc).unwrap(),
            "1970-01-01T00:00:00.000250"
        );
    }

    #[test]
    fn test_realistic_created() {
        // 2023-11-14T22:13:20 UTC
        assert_eq!(
            millis_to_iso(1_700_000_000_000.0, TimeZoneMode::Utc).unwrap(),
            "2023-11-14T22:13:20"
        );
    }

    #[test]
    fn test_before_epoch() {
        assert_eq!(
            millis_to_iso(-1500.0, TimeZoneMode::Utc).unwrap(),
            "1969-12-31T23:59:58.500000"
        );
    }

    #[test]
    fn test_local_matches_chrono_local() {
        let millis = 1_700_000_000_000.0;
        let expected = DateTime::<Utc>::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .with_timezone(&Local)
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        assert_eq!(millis_to_iso(millis, TimeZoneMode::Local).unwrap(), expected);
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            millis_to_iso(f64::NAN, TimeZoneMode::Utc),
            Err(HubError::TimestampOutOfRange { .. })
        ));
        assert!(millis_to_iso(f64::INFINITY, TimeZoneMode::Utc).is_err());
        assert!(millis_to_iso(1e300, TimeZoneMode::Utc).is_err());
        assert!(millis_to_iso(9.0e18, TimeZoneMode::Utc).is_err());

        // Years outside 1..=9999 have no four-digit ISO-8601 form
        assert!(matches!(
            millis_to_iso(253_402_300_800_000.0, TimeZoneMode::Utc),
            Err(HubError::TimestampOutOfRange { .. })
        ));
        assert!(millis_to_iso(-62_135_596_800_001.0, TimeZoneMode::Utc).is_err());
        assert!(millis_to_iso(-1e14, TimeZoneMode::Utc).is_err());
    }

    #[test]
    fn test_calendar_bounds() {
        assert_eq!(
            millis_to_iso(253_402_300_799_999.0, TimeZoneMode::Utc).unwrap(),
            "9999-12-31T23:59:59.999000"
        );
        assert_eq!(
            millis_to_iso(-62_135_596_800_000.0, TimeZoneMode::Utc).unwrap(),
            "0001-01-01T00:00:00"
        );
    }

    #[test]
    fn test_time_zone_mode_from_name() {
        assert_eq!(TimeZoneMode::from_name("utc"), Some(TimeZoneMode::Utc));
        assert_eq!(TimeZoneMode::from_name(" Local "), Some(TimeZoneMode::Local));
        assert_eq!(TimeZoneMode::from_name("mars"), None);
        assert_eq!(TimeZoneMode::default(), TimeZoneMode::Utc);
    }
}
