//! Derived per-region series types.

use chrono::NaiveDate;
use countywatch_common::RegionKey;
use countywatch_config::SeriesConfig;

/// How the doubling-rate values that cannot be estimated are reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoublingRatePolicy {
    /// Reported for a step with no growth (log2 difference of zero).
    pub saturation_sentinel: f64,
    /// Reported where no estimate exists yet.
    pub not_computable_default: f64,
}

impl Default for DoublingRatePolicy {
    fn default() -> Self {
        Self {
            saturation_sentinel: countywatch_config::DEFAULT_SATURATION_SENTINEL,
            not_computable_default: countywatch_config::DEFAULT_NOT_COMPUTABLE,
        }
    }
}

impl From<&SeriesConfig> for DoublingRatePolicy {
    fn from(config: &SeriesConfig) -> Self {
        Self {
            saturation_sentinel: config.saturation_sentinel,
            not_computable_default: config.not_computable_default,
        }
    }
}

/// Outcome of the doubling-rate recurrence at one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoublingEstimate {
    /// Not enough history, or no positive rolling value to take a log of.
    NotComputable,
    /// Days for cumulative cases to double.
    Days(f64),
    /// Zero growth since the last estimate.
    Saturated,
}

impl DoublingEstimate {
    /// Resolves the estimate to the value reported in the series.
    pub const fn value(self, policy: &DoublingRatePolicy) -> f64 {
        match self {
            Self::NotComputable => policy.not_computable_default,
            Self::Days(days) => days,
            Self::Saturated => policy.saturation_sentinel,
        }
    }

    /// Whether an estimate (or the saturation marker) exists at this date.
    pub const fn is_computed(self) -> bool {
        !matches!(self, Self::NotComputable)
    }
}

/// One date of a region's derived series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Reported cumulative cases.
    pub cumulative_cases: u64,
    /// Change from the previous observation; missing on the first one.
    /// Negative when the source revised its count downwards.
    pub new_cases: Option<i64>,
    /// Trailing mean of `cumulative_cases`; missing without a full window.
    pub rolling_cumulative_cases: Option<f64>,
    /// Trailing mean of `new_cases`; missing without a full window of
    /// defined values.
    pub rolling_new_cases: Option<f64>,
    /// Days to double, or the policy value standing in for it.
    pub doubling_rate: f64,
    /// What `doubling_rate` represents.
    pub doubling_estimate: DoublingEstimate,
}

/// The derived series of one region, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    key: RegionKey,
    window: usize,
    points: Vec<SeriesPoint>,
}

impl RegionSeries {
    /// Creates a series from already computed points.
    pub fn new(key: RegionKey, window: usize, points: Vec<SeriesPoint>) -> Self {
        Self {
            key,
            window,
            points,
        }
    }

    /// The region this series describes.
    pub const fn key(&self) -> &RegionKey {
        &self.key
    }

    /// Region (county) name, also used as the legend label.
    pub fn region_name(&self) -> &str {
        &self.key.region_name
    }

    /// Rolling window the series was computed with.
    pub const fn window(&self) -> usize {
        self.window
    }

    /// All points, ordered by date.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of dates in the series.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no dates.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last date, if any.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }

    /// `(date, cumulative cases)` pairs.
    #[allow(clippy::cast_precision_loss)]
    pub fn cumulative_points(&self) -> Vec<(NaiveDate, f64)> {
        self.points
            .iter()
            .map(|p| (p.date, p.cumulative_cases as f64))
            .collect()
    }

    /// `(rolling cumulative, rolling new)` pairs where both are defined and
    /// positive, as needed on log-log axes.
    pub fn growth_phase_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| match (p.rolling_cumulative_cases, p.rolling_new_cases) {
                (Some(total), Some(new)) if total > 0.0 && new > 0.0 => Some((total, new)),
                _ => None,
            })
            .collect()
    }

    /// `(date, doubling rate)` pairs for dates where the recurrence produced
    /// an estimate or the saturation marker.
    pub fn doubling_rate_points(&self) -> Vec<(NaiveDate, f64)> {
        self.points
            .iter()
            .filter(|p| p.doubling_estimate.is_computed())
            .map(|p| (p.date, p.doubling_rate))
            .collect()
    }
}
