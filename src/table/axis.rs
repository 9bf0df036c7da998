use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

const DASH_TS: &str = "%Y-%m-%d %H:%M:%S";
const SLASH_TS: &str = "%Y/%m/%d %H:%M:%S";

/// Parse a timestamp string into epoch millis (UTC).
///
/// Accepts RFC 3339, `"YYYY-MM-DD HH:MM:SS"`, `"YYYY/MM/DD HH:MM:SS"` and plain
/// numeric strings (already epoch millis). Returns `None` if nothing matches.
pub fn parse_timestamp_millis(s: &str) -> Option<f64> {
    let s = s.trim().trim_matches('"');
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    for fmt in [DASH_TS, SLASH_TS] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis() as f64);
        }
    }

    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric x-axis position of a cell value, or `None` if it cannot be ordered.
pub fn axis_value_millis(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_timestamp_millis(s),
        _ => None,
    }
}
