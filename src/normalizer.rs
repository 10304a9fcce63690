//! Field normalization
//!
//! This module turns raw record text into values the pipelines can group on:
//! - Label normalization (case-folding and trimming)
//! - Time-of-day and calendar date parsing across the formats activity logs use
//! - Same-day duration derivation

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Time-of-day formats tried first for Start/End cells
const TIME_FORMATS: &[&str] = &[
    "%H:%M",
    "%H:%M:%S",
    "%H:%M:%S%.f",
    "%I:%M %p",
    "%I:%M:%S %p",
    "%I:%M%p",
];

/// Full date-time formats; only their time-of-day or date part is used
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Calendar date formats for the Date column
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y", "%m/%d/%y"];

/// Case-fold and trim a label before grouping
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parse the wall-clock time of a Start/End cell.
///
/// Accepts bare times ("07:30", "7:30 PM") and full date-times, in which case
/// the date part is discarded.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(value, fmt) {
            return Some(time);
        }
    }

    parse_datetime(value).map(|dt| dt.time())
}

/// Parse a Date cell. A date-time is accepted and truncated to its date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    parse_datetime(value).map(|dt| dt.date())
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Same-day duration in hours between two wall-clock times.
///
/// Returns `None` when `end` is before `start`; there is no overnight
/// wraparound. Sub-second parts are truncated.
pub fn same_day_hours(start: NaiveTime, end: NaiveTime) -> Option<f64> {
    if end < start {
        return None;
    }
    let seconds = end.signed_duration_since(start).num_seconds();
    Some(seconds as f64 / 3600.0)
}
