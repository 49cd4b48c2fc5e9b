//! Parsing of upstream event timestamps.
//!
//! The schedule API emits ISO 8601 strings that frequently omit seconds
//! (`2025-11-12T18:20Z`), which RFC 3339 parsers reject.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::ScheduleError;

/// Parses an upstream event date into a UTC timestamp.
///
/// Accepts a trailing `Z` or a numeric offset, with or without seconds.
/// Strings without any offset are taken to be UTC.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use sportscal_core::schedule::parse_event_start;
///
/// let expected = Utc.with_ymd_and_hms(2025, 11, 12, 18, 20, 0).unwrap();
/// assert_eq!(parse_event_start("2025-11-12T18:20Z").unwrap(), expected);
/// assert_eq!(parse_event_start("2025-11-12T18:20:00Z").unwrap(), expected);
/// ```
pub fn parse_event_start(raw: &str) -> Result<DateTime<Utc>, ScheduleError> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ScheduleError::InvalidDate(raw.to_string()))
}
