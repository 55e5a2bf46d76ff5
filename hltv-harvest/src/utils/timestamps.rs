//! Match date parsing.
//!
//! Match pages carry the kickoff time twice: as a `data-unix` millisecond
//! attribute and as display text (`"17th of October 2026"` plus `"18:00"`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

#[allow(clippy::expect_used)]
fn ordinal_regex() -> &'static Regex {
    static ORDINAL: OnceLock<Regex> = OnceLock::new();
    ORDINAL.get_or_init(|| {
        Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)(?:\s+of)?\s+").expect("ordinal pattern is valid")
    })
}

/// Parses a millisecond Unix timestamp such as the `data-unix` attribute.
pub fn parse_unix_millis(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    let millis: i64 = trimmed
        .parse()
        .map_err(|_| TimestampError::InvalidFormat(trimmed.to_string()))?;

    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| TimestampError::InvalidFormat(trimmed.to_string()))
}

/// Parses display date and time texts into a UTC timestamp.
///
/// Accepts `"17th of October 2026"`, `"17 October 2026"` and ISO dates; the
/// time is `HH:MM` and defaults to midnight when empty.
pub fn parse_match_date(date_text: &str, time_text: &str) -> Result<Timestamp, TimestampError> {
    let date_text = date_text.trim();
    if date_text.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    let normalized = ordinal_regex().replace(date_text, "$1 ");
    let date = ["%d %B %Y", "%d %b %Y", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(|| TimestampError::InvalidFormat(date_text.to_string()))?;

    let time_text = time_text.trim();
    let time = if time_text.is_empty() {
        NaiveTime::default()
    } else {
        NaiveTime::parse_from_str(time_text, "%H:%M")
            .map_err(|_| TimestampError::InvalidFormat(time_text.to_string()))?
    };

    Ok(Utc.from_utc_datetime(&NaiveDateTime::new(date, time)))
}

/// Formats a timestamp as ISO 8601 string.
#[must_use]
pub fn format_iso8601(dt: &Timestamp) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}
