//! Formatting helpers shared by every panel
//!
//! Percentages, record field values, arrival times and short labels.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Shown in place of a missing or null field value
pub const EMPTY_PLACEHOLDER: &str = "—";

/// Format a percentage value (already scaled to 0..=100)
///
/// # Examples
///
/// ```
/// use threat_hunter_core::formatting::format_percent;
///
/// assert_eq!(format_percent(75.5), "75.5%");
/// assert_eq!(format_percent(100.0), "100.0%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a 0..=1 fraction as a percentage
///
/// # Examples
///
/// ```
/// use threat_hunter_core::formatting::format_fraction_percent;
///
/// assert_eq!(format_fraction_percent(0.042), "4.2%");
/// assert_eq!(format_fraction_percent(1.0), "100.0%");
/// ```
pub fn format_fraction_percent(fraction: f64) -> String {
    if fraction.is_finite() {
        format_percent(fraction * 100.0)
    } else {
        format_percent(0.0)
    }
}

/// Format `part / total` as a percentage, "0.0%" when total is 0
pub fn format_share_percent(part: u64, total: u64) -> String {
    if total == 0 {
        format_percent(0.0)
    } else {
        format_percent(part as f64 / total as f64 * 100.0)
    }
}

/// Render one record field value for display
///
/// Strings are shown without quotes, null as [`EMPTY_PLACEHOLDER`], and
/// anything structured as compact JSON.
///
/// # Examples
///
/// ```
/// use threat_hunter_core::formatting::format_scalar;
/// use serde_json::json;
///
/// assert_eq!(format_scalar(&json!("TCP")), "TCP");
/// assert_eq!(format_scalar(&json!(443)), "443");
/// assert_eq!(format_scalar(&json!(null)), "—");
/// ```
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_PLACEHOLDER.to_string(),
        Value::String(s) if s.is_empty() => EMPTY_PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Display text for an optional FileKey
pub fn format_file_key(file_key: Option<&str>) -> String {
    match file_key {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => EMPTY_PLACEHOLDER.to_string(),
    }
}

/// Format a duration in its largest whole unit
fn format_duration_human(duration: Duration) -> String {
    let secs = duration.num_seconds().abs();

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Format the age of `timestamp` relative to `now` ("5s ago")
pub fn format_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    if duration < Duration::zero() {
        "just now".to_string()
    } else {
        format!("{} ago", format_duration_human(duration))
    }
}

/// Format time relative to the current clock
pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    format_age(timestamp, Utc::now())
}

/// Local wall-clock time of a record's arrival
pub fn format_arrival_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S")
        .to_string()
}

/// Truncate a string to at most `max_len` characters with an ellipsis
///
/// # Examples
///
/// ```
/// use threat_hunter_core::formatting::truncate_string;
///
/// assert_eq!(truncate_string("192.168.100.200", 10), "192.168...");
/// assert_eq!(truncate_string("TCP", 10), "TCP");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a count with singular/plural form
///
/// # Examples
///
/// ```
/// use threat_hunter_core::formatting::pluralize;
///
/// assert_eq!(pluralize(1, "packet", "packets"), "1 packet");
/// assert_eq!(pluralize(0, "packet", "packets"), "0 packets");
/// ```
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(4.2), "4.2%");
    }

    #[test]
    fn test_format_fraction_percent() {
        assert_eq!(format_fraction_percent(0.042), "4.2%");
        assert_eq!(format_fraction_percent(0.0), "0.0%");
        assert_eq!(format_fraction_percent(f64::NAN), "0.0%");
    }

    #[test]
    fn test_format_share_percent() {
        assert_eq!(format_share_percent(42, 1000), "4.2%");
        assert_eq!(format_share_percent(0, 0), "0.0%");
        assert_eq!(format_share_percent(1, 3), "33.3%");
    }

    #[test]
    fn test_format_scalar() {
        assert_eq!(format_scalar(&json!(0.25)), "0.25");
        assert_eq!(format_scalar(&json!(true)), "true");
        assert_eq!(format_scalar(&json!("")), "—");
        assert_eq!(format_scalar(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_format_file_key() {
        assert_eq!(format_file_key(Some("abc")), "abc");
        assert_eq!(format_file_key(Some("")), "—");
        assert_eq!(format_file_key(None), "—");
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age(now - Duration::seconds(5), now), "5s ago");
        assert_eq!(format_age(now - Duration::minutes(3), now), "3m ago");
        assert_eq!(format_age(now + Duration::seconds(5), now), "just now");
    }

    #[test]
    fn test_format_duration_human() {
        assert_eq!(format_duration_human(Duration::seconds(30)), "30s");
        assert_eq!(format_duration_human(Duration::seconds(90)), "1m");
        assert_eq!(format_duration_human(Duration::hours(2)), "2h");
        assert_eq!(format_duration_human(Duration::days(3)), "3d");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello, World!", 10), "Hello, ...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Hello", 3), "Hel");
        // Counts characters, not bytes
        assert_eq!(truncate_string("ééé", 3), "ééé");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(5, "feature", "features"), "5 features");
    }
}
