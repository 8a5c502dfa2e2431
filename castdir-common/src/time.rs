//! Timestamp utilities
//!
//! Dates are stored as `YYYY-MM-DD` and update timestamps as local wall-clock
//! time with microsecond precision; responses show seconds only.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use crate::{Error, Result};

/// Date format used on the wire and in storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used in responses
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for update timestamps (fixed width, sorts lexically)
pub const STORED_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Current local wall-clock time, truncated to microseconds
pub fn now() -> NaiveDateTime {
    let ts = Local::now().naive_local();
    let micros = ts.nanosecond() / 1_000;
    ts.with_nanosecond(micros * 1_000).unwrap_or(ts)
}

/// Format a timestamp for storage
pub fn format_stored_datetime(ts: &NaiveDateTime) -> String {
    ts.format(STORED_DATETIME_FORMAT).to_string()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_datetime(ts: &NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("invalid date '{}': {}", value, e)))
}
