//! Axis helpers shared by the chart panels.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Utility functions for axis ranges and ticks.
pub struct GraphUtils;

impl GraphUtils {
    /// Every `weekday` between `start` and `end` inclusive. Falls back to
    /// the two endpoints when the span holds no such day.
    pub fn weekday_ticks(start: NaiveDate, end: NaiveDate, weekday: Weekday) -> Vec<NaiveDate> {
        let offset = (7 + weekday.num_days_from_monday() - start.weekday().num_days_from_monday()) % 7;
        let mut ticks = Vec::new();
        let mut tick = start + Duration::days(i64::from(offset));
        while tick <= end {
            ticks.push(tick);
            tick += Duration::days(7);
        }

        if ticks.is_empty() {
            ticks.push(start);
            if end != start {
                ticks.push(end);
            }
        }
        ticks
    }

    /// A date range covering `span`, at least one day wide. Without a span
    /// an arbitrary one-day range is returned.
    pub fn date_range(span: Option<(NaiveDate, NaiveDate)>) -> (NaiveDate, NaiveDate) {
        let (start, end) = span.unwrap_or_default();
        if end > start {
            (start, end)
        } else {
            (start, start + Duration::days(1))
        }
    }

    /// `0..max` with headroom above the largest value.
    pub fn linear_range(max: f64) -> (f64, f64) {
        if max.is_finite() && max > 0.0 {
            (0.0, max * 1.05)
        } else {
            (0.0, 1.0)
        }
    }

    /// A log-axis range around positive values, padded by a quarter decade
    /// on each side. `1..10` when there are no values.
    pub fn log_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite() && *v > 0.0)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if lo.is_finite() && hi.is_finite() {
            (lo / 1.8, hi * 1.8)
        } else {
            (1.0, 10.0)
        }
    }

    /// Maps `value` onto an inverted axis over `[min, max]`: the value is
    /// clamped to the range and mirrored so that `min` is drawn at the top.
    /// Applying it twice returns the clamped value.
    pub fn invert_within(value: f64, (min, max): (f64, f64)) -> f64 {
        max + min - value.clamp(min, max)
    }
}
