//! Shared date helpers.

use crate::error::{CountyWatchError, Result};
use chrono::NaiveDate;

/// ISO 8601 calendar date format used by the dataset and chart axes.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).map_err(|e| {
        CountyWatchError::with_source(format!("Invalid ISO date '{input}'"), e)
    })
}
