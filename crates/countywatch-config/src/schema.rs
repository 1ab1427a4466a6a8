//! Configuration schema definitions using serde.

use chrono::Weekday;
use countywatch_common::{LoggingConfig, RegionKey};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for County Watch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset location.
    pub data: DataConfig,
    /// Derived series parameters.
    pub series: SeriesConfig,
    /// Figure layout shared by every chart.
    pub chart: ChartConfig,
    /// Figures to render, one image each.
    pub figures: Vec<FigureConfig>,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Dataset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the county-level CSV file.
    pub path: PathBuf,
}

/// Parameters of the derived per-region series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Trailing window length, in observations, of the rolling averages.
    pub window: usize,
    /// Doubling rate reported for a step with no growth.
    pub saturation_sentinel: f64,
    /// Doubling rate reported where no estimate exists yet.
    pub not_computable_default: f64,
}

/// Figure layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Directory that figure outputs are written to.
    pub output_dir: PathBuf,
    /// Weekday carrying the major ticks of date axes.
    pub tick_weekday: Weekday,
    /// Visible y range of the doubling-rate panel, `[min, max]`.
    pub doubling_rate_range: (f64, f64),
    /// Whether date labels are drawn rotated.
    pub rotate_date_labels: bool,
    /// Background colour as `#RRGGBB`.
    pub background_color: String,
}

/// One output image and the regions drawn on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Short identifier used to select figures on the command line.
    pub name: String,
    /// Output file, relative to `chart.output_dir` unless absolute.
    pub output: PathBuf,
    /// Optional caption drawn above the panels.
    #[serde(default)]
    pub title: Option<String>,
    /// Regions drawn in every panel of this figure.
    pub regions: Vec<RegionEntry>,
}

/// A region to draw and the style token it is drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    /// Region (county) name.
    pub region: String,
    /// Parent region (state) name.
    pub parent: String,
    /// Line style token such as `"r-"` or `"b--"`.
    pub style: String,
}

impl RegionEntry {
    /// Creates a region entry.
    pub fn new(region: &str, parent: &str, style: &str) -> Self {
        Self {
            region: region.to_string(),
            parent: parent.to_string(),
            style: style.to_string(),
        }
    }

    /// The dataset key for this entry.
    pub fn key(&self) -> RegionKey {
        RegionKey::new(self.region.clone(), self.parent.clone())
    }
}

impl FigureConfig {
    /// Resolves the output path against the configured output directory.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            output_dir.join(&self.output)
        }
    }
}

impl Config {
    /// Finds a figure by name.
    pub fn figure(&self, name: &str) -> Option<&FigureConfig> {
        self.figures.iter().find(|f| f.name == name)
    }
}
