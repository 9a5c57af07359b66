//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a date like "Mon 10 Mar".
///
/// Usage in templates: `{{ date|fmt_day }}`
#[askama::filter_fn]
pub fn fmt_day(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_day(&value.to_string()))
}

/// Formats a time-of-day like "10:30".
///
/// Usage in templates: `{{ cutoff|fmt_time }}`
#[askama::filter_fn]
pub fn fmt_time(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_time(&value.to_string()))
}

/// "YYYY-MM-DD" -> "Mon 10 Mar"; anything unparsable passes through.
fn format_day(raw: &str) -> String {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_or_else(
        |_| raw.to_owned(),
        |date| date.format("%a %e %b").to_string().trim().to_owned(),
    )
}

/// "HH:MM:SS" -> "HH:MM"; anything unparsable passes through.
fn format_time(raw: &str) -> String {
    chrono::NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .map_or_else(|_| raw.to_owned(), |time| time.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_day() {
        assert_eq!(format_day("2025-03-10"), "Mon 10 Mar");
    }

    #[test]
    fn test_format_day_passthrough_on_garbage() {
        assert_eq!(format_day("not-a-date"), "not-a-date");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time("10:30:00"), "10:30");
        assert_eq!(format_time("10:30"), "10:30");
    }
}
