//! Lenient parsing of values coming back from the backend services.
//!
//! Upstream systems disagree on timestamp and number formats. Every helper
//! here returns `None` instead of failing so callers can treat bad input as
//! missing data.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::constants::NOT_AVAILABLE;

/// Naive formats tried after RFC 3339, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a timestamp in any of the formats the backends emit.
///
/// Accepts RFC 3339 (including a trailing `Z`), space or `T` separated
/// naive date-times with optional fractional seconds, and bare dates. Naive
/// values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a percentage string such as `"85"`, `"85.5"` or `"85 %"`.
///
/// Returns `None` for empty strings, the "Not Available" sentinel and
/// anything that is not a finite number.
pub fn parse_percent(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return None;
    }

    value
        .trim_end_matches('%')
        .trim_end()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Read a JSON cell as a float (numbers or numeric strings)
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Read a JSON cell as an integer, truncating fractional values
pub fn value_as_i64(value: &Value) -> Option<i64> {
    value_as_f64(value).map(|v| v.trunc() as i64)
}

/// Read a JSON cell as a non-empty string
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};
    use serde_json::json;

    #[test]
    fn test_parse_rfc3339_with_zulu() {
        let ts = parse_timestamp("2025-12-03T10:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 12, 3, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2025-12-03T12:00:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_space_separated() {
        let ts = parse_timestamp("2025-11-27 01:15:17").unwrap();
        assert_eq!(ts.day(), 27);
        assert_eq!(ts.minute(), 15);

        assert!(parse_timestamp("2025-11-27 01:15:17.250").is_some());
        assert!(parse_timestamp("2025-11-27T01:15:17").is_some());
        assert!(parse_timestamp("2025-11-27").is_some());
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("Never synced").is_none());
        assert!(parse_timestamp("2025-13-45 99:00:00").is_none());
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("85"), Some(85.0));
        assert_eq!(parse_percent(" 42.5 "), Some(42.5));
        assert_eq!(parse_percent("91%"), Some(91.0));
        assert_eq!(parse_percent("91 %"), Some(91.0));
        assert_eq!(parse_percent("Not Available"), None);
        assert_eq!(parse_percent("n/a"), None);
        assert_eq!(parse_percent("NaN"), None);
        assert_eq!(parse_percent(""), None);
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(value_as_f64(&json!(12.5)), Some(12.5));
        assert_eq!(value_as_f64(&json!("7")), Some(7.0));
        assert_eq!(value_as_f64(&json!(null)), None);
        assert_eq!(value_as_i64(&json!(3.9)), Some(3));
        assert_eq!(value_as_i64(&json!("x")), None);
        assert_eq!(value_as_string(&json!("Windows")), Some("Windows".into()));
        assert_eq!(value_as_string(&json!("")), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(100.0), 100.0);
    }
}
