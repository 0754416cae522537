//! Lenient scalar parsing shared by the provider normalisers.

use chrono::{DateTime, NaiveDate, Utc};

/// Parses an RFC 3339 timestamp, returning `None` when malformed.
#[must_use]
pub fn timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Parses the calendar date at the start of an ISO date or datetime.
///
/// `2024-03-01` and `2024-03-01T09:30:00.000+01:00` both yield 1 March 2024.
#[must_use]
pub fn date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Formats a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}
