//! Default configuration values.

use crate::schema::*;
use chrono::Weekday;
use countywatch_common::LoggingConfig;
use std::path::PathBuf;

/// Default trailing window of the rolling averages.
pub const DEFAULT_WINDOW: usize = 7;

/// Default doubling rate for zero-growth steps.
pub const DEFAULT_SATURATION_SENTINEL: f64 = 100.0;

/// Default doubling rate before an estimate exists.
pub const DEFAULT_NOT_COMPUTABLE: f64 = 0.0;

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            series: SeriesConfig::default(),
            chart: ChartConfig::default(),
            figures: default_figures(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("covid-19-data/us-counties.csv"),
        }
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            saturation_sentinel: DEFAULT_SATURATION_SENTINEL,
            not_computable_default: DEFAULT_NOT_COMPUTABLE,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 500,
            output_dir: PathBuf::from("Images"),
            tick_weekday: Weekday::Sun,
            doubling_rate_range: (0.0, 14.0),
            rotate_date_labels: true,
            background_color: "#FFFFFF".to_string(),
        }
    }
}

fn figure(name: &str, output: &str, regions: Vec<RegionEntry>) -> FigureConfig {
    FigureConfig {
        name: name.to_string(),
        output: PathBuf::from(output),
        title: None,
        regions,
    }
}

/// The figures rendered when the configuration names none.
pub fn default_figures() -> Vec<FigureConfig> {
    vec![
        figure(
            "michigan",
            "covid_michigan.png",
            vec![
                RegionEntry::new("Kent", "Michigan", "r-"),
                RegionEntry::new("Washtenaw", "Michigan", "b-"),
                RegionEntry::new("Wayne", "Michigan", "b--"),
                RegionEntry::new("Kalamazoo", "Michigan", "m-"),
            ],
        ),
        figure(
            "newyork",
            "covid_newyork.png",
            vec![
                RegionEntry::new("Schenectady", "New York", "k-"),
                RegionEntry::new("Albany", "New York", "k--"),
            ],
        ),
        figure(
            "georgia",
            "covid_georgia.png",
            vec![RegionEntry::new("Chatham", "Georgia", "g-")],
        ),
        figure(
            "mass",
            "covid_mass.png",
            vec![
                RegionEntry::new("Essex", "Massachusetts", "c-"),
                RegionEntry::new("Suffolk", "Massachusetts", "c--"),
            ],
        ),
        figure(
            "illinois",
            "covid_illinois.png",
            vec![
                RegionEntry::new("DeKalb", "Illinois", "c-"),
                RegionEntry::new("Cook", "Illinois", "c--"),
            ],
        ),
        figure(
            "nyc",
            "covid_ny.png",
            vec![RegionEntry::new("New York City", "New York", "k")],
        ),
    ]
}
