//! Test utilities and shared fixtures for County Watch.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for the unit and integration tests of the other workspace crates.

use crate::types::RawRecord;
use chrono::{Duration, NaiveDate};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Shorthand for a calendar date in fixtures.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Dataset fixtures.
pub mod fixtures {
    use super::*;

    /// One record per day for a single region, starting at `start`.
    pub fn region_records(
        region_name: &str,
        parent_region: &str,
        start: NaiveDate,
        cumulative: &[u64],
    ) -> Vec<RawRecord> {
        cumulative
            .iter()
            .enumerate()
            .map(|(offset, &cases)| {
                let offset = i64::try_from(offset).expect("fixture offset fits in i64");
                RawRecord::new(
                    start + Duration::days(offset),
                    region_name,
                    parent_region,
                    cases,
                )
            })
            .collect()
    }

    /// A small multi-region dataset, interleaved by date the way the
    /// published county file is, with one region listed out of date order.
    pub fn sample_records() -> Vec<RawRecord> {
        let start = date(2020, 3, 20);
        let mut kent = region_records("Kent", "Michigan", start, &[1, 2, 4, 8, 16, 32, 64, 128, 256, 512]);
        let wayne = region_records("Wayne", "Michigan", start, &[10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        let kent_de = region_records("Kent", "Delaware", start, &[5, 5, 5, 5, 5, 5, 5, 5, 5, 5]);

        kent.reverse();

        let mut records = Vec::new();
        for i in 0..10 {
            records.push(kent[i].clone());
            records.push(wayne[i].clone());
            records.push(kent_de[i].clone());
        }
        records
    }

    /// The sample dataset rendered in the published CSV layout
    /// (`date,county,state,fips,cases,deaths`).
    pub fn sample_csv() -> String {
        let mut out = String::from("date,county,state,fips,cases,deaths\n");
        for record in sample_records() {
            out.push_str(&format!(
                "{},{},{},,{},0\n",
                crate::utils::format_iso_date(record.date),
                record.region_name,
                record.parent_region,
                record.cumulative_cases
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_region_records_are_consecutive_days() {
        let records = region_records("Kent", "Michigan", date(2020, 3, 31), &[1, 2, 3]);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].date, date(2020, 4, 1));
        assert_eq!(records[2].cumulative_cases, 3);
    }

    #[test]
    fn test_sample_csv_has_header_and_rows() {
        let csv = sample_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,county,state,fips,cases,deaths"));
        assert_eq!(lines.count(), sample_records().len());
    }

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0 + 1e-12, 1e-9);
    }
}
