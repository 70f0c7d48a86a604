//! Lenient date parsing for loan payloads.
//!
//! Forms send plain `YYYY-MM-DD` dates while API clients send full timestamps;
//! both are accepted and read as local wall-clock time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a date or date-time string. A bare date means midnight.
pub fn parse_flexible(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn parse_or_error<E: serde::de::Error>(raw: &str) -> Result<NaiveDateTime, E> {
    parse_flexible(raw).ok_or_else(|| E::custom(format!("invalid date: {}", raw)))
}

/// `deserialize_with` helper for optional date fields; empty strings are `None`
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_or_error(&raw).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let parsed = parse_flexible("2024-05-01").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_time(NaiveTime::MIN));
    }

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_flexible("2024-05-01T23:59:59.999").unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap()
        );
        assert!(parse_flexible("2024-05-01 10:30:00").is_some());
        assert!(parse_flexible("2024-05-01T10:30").is_some());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_flexible("01/05/2024").is_none());
        assert!(parse_flexible("").is_none());
    }
}
