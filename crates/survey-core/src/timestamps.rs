use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::warn;

/// Naive formats tried after RFC 3339, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a classification timestamp from a JSON value.
///
/// Handles:
/// * `null`       → `None`
/// * JSON string  → RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, or a bare date
/// * JSON number  → Unix seconds (integer or float)
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Null => None,
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                DateTime::from_timestamp(secs, 0)
            } else {
                let f = n.as_f64()?;
                // Floor so negative values keep their fraction: -1.5 is -2s + 0.5s.
                let mut secs = f.floor();
                let mut nanos = ((f - secs) * 1_000_000_000.0).round() as u32;
                if nanos >= 1_000_000_000 {
                    secs += 1.0;
                    nanos = 0;
                }
                DateTime::from_timestamp(secs as i64, nanos)
            }
        }
        _ => None,
    }
}

/// String form of [`parse_timestamp`].
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&naive));
    }

    warn!("could not parse classification timestamp \"{}\"", s);
    None
}
