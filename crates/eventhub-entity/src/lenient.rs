//! Tolerant deserializers for records handed over by the external data layer.
//!
//! Malformed fields turn into `None` instead of failing the whole record, so
//! a single bad row never hides the rest of a user's tickets.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept an identifier given as a JSON string or number.
///
/// Empty strings, `null`, and any other JSON type become `None`.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept a string field, turning every non-string value into `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Accept a timestamp given as a string or as epoch milliseconds.
///
/// Numbers are normalised to RFC 3339 so the raw field always holds text
/// that [`parse_timestamp`] understands. Out-of-range numbers become `None`.
pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339()),
        _ => None,
    })
}

/// Accept a string field, defaulting to an empty string.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// Parse a timestamp in any of the shapes the data layer emits.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` or
/// `YYYY-MM-DD HH:MM:SS` (taken as UTC), and bare `YYYY-MM-DD`
/// (midnight UTC). Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_timestamp("2026-03-01T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            parse_timestamp("2026-03-01T10:30:00.250").unwrap().timestamp(),
            Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap().timestamp()
        );
        assert_eq!(
            parse_timestamp("2026-03-01 10:30:00").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2026-03-01").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[derive(Debug, Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "opt_timestamp")]
        at: Option<String>,
    }

    #[test]
    fn test_opt_timestamp_accepts_epoch_millis() {
        let stamped: Stamped = serde_json::from_str(r#"{"at": 1700000000000}"#).unwrap();
        let parsed = parse_timestamp(stamped.at.as_deref().unwrap()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap());

        let stamped: Stamped = serde_json::from_str(r#"{"at": "2026-03-01"}"#).unwrap();
        assert_eq!(stamped.at.as_deref(), Some("2026-03-01"));

        let stamped: Stamped = serde_json::from_str(r#"{"at": true}"#).unwrap();
        assert!(stamped.at.is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("2026-13-45").is_none());
    }
}
