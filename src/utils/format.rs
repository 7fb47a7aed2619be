//! Formatting utilities for file sizes, dates, and other display values.
//!
//! Dates are shown in UTC, the same zone the API reports them in.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format file size for display (e.g., "1.2 KB", "3.4 MB").
pub fn format_size(size: Option<u64>) -> String {
    match size {
        None => "-".to_string(),
        Some(bytes) if bytes >= 1_000_000_000 => {
            format!("{:.1} GB", bytes as f64 / 1_000_000_000.0)
        }
        Some(bytes) if bytes >= 1_000_000 => format!("{:.1} MB", bytes as f64 / 1_000_000.0),
        Some(bytes) if bytes >= 1_000 => format!("{:.1} KB", bytes as f64 / 1_000.0),
        Some(bytes) => format!("{} B", bytes),
    }
}

/// Calendar date (e.g., "Mar 10, 2024").
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// Date and time (e.g., "Mar 10, 2024 09:05").
pub fn format_datetime(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %H:%M").to_string()
}

/// Coarse age relative to `now` (e.g., "5 minutes ago").
pub fn format_relative(at: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = (*now - *at).num_seconds();
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    };
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => plural(s / 60, "minute"),
        s if s < 86_400 => plural(s / 3_600, "hour"),
        s if s < 7 * 86_400 => plural(s / 86_400, "day"),
        _ => format_date(at),
    }
}

/// Value for an `<input type="datetime-local">`.
pub fn to_datetime_local(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M").to_string()
}

/// Parse an `<input type="datetime-local">` value, with or without seconds.
pub fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse an `<input type="date">` value into the `YYYY-MM-DD` filter form.
pub fn parse_date_input(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Shorten `text` to at most `max` characters, ending with "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(None), "-");
        assert_eq!(format_size(Some(500)), "500 B");
        assert_eq!(format_size(Some(1500)), "1.5 KB");
        assert_eq!(format_size(Some(1_500_000)), "1.5 MB");
        assert_eq!(format_size(Some(2_000_000_000)), "2.0 GB");
    }

    #[test]
    fn test_format_dates() {
        let t = at("2024-03-05T09:07:00Z");
        assert_eq!(format_date(&t), "Mar 5, 2024");
        assert_eq!(format_datetime(&t), "Mar 5, 2024 09:07");
    }

    #[test]
    fn test_format_relative() {
        let now = at("2024-03-10T12:00:00Z");
        assert_eq!(format_relative(&at("2024-03-10T11:59:30Z"), &now), "just now");
        assert_eq!(format_relative(&at("2024-03-10T11:59:00Z"), &now), "1 minute ago");
        assert_eq!(format_relative(&at("2024-03-10T09:00:00Z"), &now), "3 hours ago");
        assert_eq!(format_relative(&at("2024-03-08T12:00:00Z"), &now), "2 days ago");
        assert_eq!(format_relative(&at("2024-01-01T00:00:00Z"), &now), "Jan 1, 2024");
    }

    #[test]
    fn test_datetime_local_round_trip() {
        let t = at("2024-03-10T09:30:00Z");
        assert_eq!(to_datetime_local(&t), "2024-03-10T09:30");
        assert_eq!(parse_datetime_local("2024-03-10T09:30"), Some(t));
        assert_eq!(parse_datetime_local("2024-03-10T09:30:00"), Some(t));
        assert_eq!(parse_datetime_local(""), None);
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input(" 2024-03-10 ").as_deref(), Some("2024-03-10"));
        assert_eq!(parse_date_input("2024-02-30"), None);
        assert_eq!(parse_date_input(""), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long description", 10), "a long ...");
    }
}
