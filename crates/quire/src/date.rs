//! Post dates.
//!
//! Front matter carries dates as `2024-01-05 10:00:00 UTC`. A trailing zone
//! abbreviation is dropped and the time read as UTC; RFC 3339 timestamps and
//! bare `YYYY-MM-DD` dates are accepted too.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a front-matter date. Returns `None` for anything unrecognised.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }

    let local = match text.rsplit_once(' ') {
        Some((rest, zone)) if zone.chars().all(|c| c.is_ascii_alphabetic()) => {
            if !matches!(zone, "UTC" | "GMT" | "Z") {
                tracing::debug!(zone, "unknown zone abbreviation read as UTC");
            }
            rest
        }
        _ => text,
    };

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(local, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Formats a date for readers: `Jan 5, 2024`.
pub fn display_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Formats a date for Atom: `2024-01-05T10:00:00Z`.
pub fn atom_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
