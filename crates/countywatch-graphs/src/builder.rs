//! Per-region derived series: first differences, rolling means and the
//! doubling-rate recurrence.

use crate::dataset::Dataset;
use crate::series::{DoublingEstimate, DoublingRatePolicy, RegionSeries, SeriesPoint};
use countywatch_common::{CountyWatchError, RawRecord, RegionKey, Result};
use tracing::{debug, warn};

/// Builds the derived series of one region from a shared dataset.
#[derive(Debug, Clone, Default)]
pub struct RegionSeriesBuilder {
    policy: DoublingRatePolicy,
}

impl RegionSeriesBuilder {
    /// Creates a builder reporting doubling rates with `policy`.
    pub const fn new(policy: DoublingRatePolicy) -> Self {
        Self { policy }
    }

    /// Filters `dataset` to `key`, orders the rows by date and derives every
    /// column with a trailing window of `window` observations.
    ///
    /// Fails with `MissingRegion` when no row matches and with a validation
    /// error when `window` is zero. A window longer than the history is not
    /// an error; the rolling columns are then all missing.
    pub fn build(&self, dataset: &Dataset, key: &RegionKey, window: usize) -> Result<RegionSeries> {
        if window == 0 {
            return Err(CountyWatchError::validation_field(
                "Rolling window must be at least 1",
                "window",
            ));
        }

        let mut rows: Vec<&RawRecord> = dataset.records_for(key);
        if rows.is_empty() {
            return Err(CountyWatchError::missing_region(
                key.region_name.clone(),
                key.parent_region.clone(),
            ));
        }
        rows.sort_by_key(|r| r.date);

        if let Some(pair) = rows.windows(2).find(|w| w[0].date == w[1].date) {
            warn!(region = %key, date = %pair[0].date, "Duplicate observation date");
        }

        if window > rows.len() {
            warn!(
                region = %key,
                window,
                observations = rows.len(),
                "Window longer than history, rolling averages unavailable"
            );
        }

        let cumulative: Vec<u64> = rows.iter().map(|r| r.cumulative_cases).collect();
        let new_cases = first_differences(&cumulative);

        for (row, delta) in rows.iter().zip(&new_cases) {
            if let Some(delta) = delta.filter(|d| *d < 0) {
                warn!(
                    region = %key,
                    date = %row.date,
                    new_cases = delta,
                    "Cumulative count decreased"
                );
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let rolling_cumulative = rolling_mean(
            &cumulative.iter().map(|&c| Some(c as f64)).collect::<Vec<_>>(),
            window,
        );
        #[allow(clippy::cast_precision_loss)]
        let rolling_new = rolling_mean(
            &new_cases.iter().map(|d| d.map(|v| v as f64)).collect::<Vec<_>>(),
            window,
        );
        let estimates = doubling_estimates(&rolling_cumulative);

        let points: Vec<SeriesPoint> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| SeriesPoint {
                date: row.date,
                cumulative_cases: row.cumulative_cases,
                new_cases: new_cases[i],
                rolling_cumulative_cases: rolling_cumulative[i],
                rolling_new_cases: rolling_new[i],
                doubling_rate: estimates[i].value(&self.policy),
                doubling_estimate: estimates[i],
            })
            .collect();

        debug!(
            region = %key,
            points = points.len(),
            window,
            "Built region series"
        );

        Ok(RegionSeries::new(key.clone(), window, points))
    }
}

/// `out[i] = values[i] - values[i - 1]`, missing at index 0. Decreases are
/// kept as negative values.
pub fn first_differences(values: &[u64]) -> Vec<Option<i64>> {
    std::iter::once(None)
        .chain(values.windows(2).map(|w| {
            let delta = i128::from(w[1]) - i128::from(w[0]);
            Some(i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX }))
        }))
        .take(values.len())
        .collect()
}

/// Trailing mean over `window` values ending at each index.
///
/// Missing until `window` values are available, and missing wherever the
/// window contains a missing value.
#[allow(clippy::cast_precision_loss)]
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let sum: Option<f64> = values[i + 1 - window..=i].iter().copied().sum();
            sum.map(|s| s / window as f64)
        })
        .collect()
}

/// One step of the doubling-rate recurrence.
///
/// `anchor` is the log2 value of the last step that produced an estimate
/// (or seeded the recurrence); `rolling` is the rolling cumulative value at
/// the current step. Returns the estimate and the next anchor.
pub fn doubling_step(anchor: Option<f64>, rolling: Option<f64>) -> (DoublingEstimate, Option<f64>) {
    let current = rolling.filter(|v| *v > 0.0).map(f64::log2);

    match (anchor, current) {
        (Some(previous), Some(current)) => {
            let days = 1.0 / (current - previous);
            if days.is_finite() {
                (DoublingEstimate::Days(days), Some(current))
            } else {
                (DoublingEstimate::Saturated, anchor)
            }
        }
        (None, Some(current)) => (DoublingEstimate::NotComputable, Some(current)),
        (_, None) => (DoublingEstimate::NotComputable, anchor),
    }
}

/// Runs [`doubling_step`] over a rolling cumulative column.
pub fn doubling_estimates(rolling_cumulative: &[Option<f64>]) -> Vec<DoublingEstimate> {
    rolling_cumulative
        .iter()
        .scan(None, |anchor, &rolling| {
            let (estimate, next) = doubling_step(*anchor, rolling);
            *anchor = next;
            Some(estimate)
        })
        .collect()
}
