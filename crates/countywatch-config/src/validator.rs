//! Runtime validation of a loaded configuration.

use crate::schema::{ChartConfig, Config, FigureConfig, SeriesConfig};
use countywatch_common::{CountyWatchError, Result};
use std::collections::HashSet;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        Self::validate_series(&config.series)?;
        Self::validate_chart(&config.chart)?;
        Self::validate_figures(&config.figures)?;

        if config.data.path.as_os_str().is_empty() {
            return Err(CountyWatchError::validation_field(
                "Dataset path cannot be empty",
                "data.path",
            ));
        }

        Ok(())
    }

    /// Validates the derived series parameters.
    pub fn validate_series(series: &SeriesConfig) -> Result<()> {
        if series.window == 0 {
            return Err(CountyWatchError::validation_field(
                "Rolling window must be at least 1",
                "series.window",
            ));
        }

        if !series.saturation_sentinel.is_finite() {
            return Err(CountyWatchError::validation_field(
                "Saturation sentinel must be a finite number",
                "series.saturation_sentinel",
            ));
        }

        if !series.not_computable_default.is_finite() {
            return Err(CountyWatchError::validation_field(
                "Not-computable default must be a finite number",
                "series.not_computable_default",
            ));
        }

        Ok(())
    }

    /// Validates the figure layout.
    pub fn validate_chart(chart: &ChartConfig) -> Result<()> {
        if chart.width == 0 || chart.height == 0 {
            return Err(CountyWatchError::validation_field(
                format!("Figure size {}x{} must be non-zero", chart.width, chart.height),
                "chart.width",
            ));
        }

        let (min, max) = chart.doubling_rate_range;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(CountyWatchError::validation_field(
                format!("Doubling rate range [{min}, {max}] must be finite and increasing"),
                "chart.doubling_rate_range",
            ));
        }

        if !is_hex_color(&chart.background_color) {
            return Err(CountyWatchError::validation_field(
                format!("Background colour '{}' is not #RRGGBB", chart.background_color),
                "chart.background_color",
            ));
        }

        Ok(())
    }

    /// Validates the figure list.
    pub fn validate_figures(figures: &[FigureConfig]) -> Result<()> {
        let mut names = HashSet::new();

        for figure in figures {
            if figure.name.trim().is_empty() {
                return Err(CountyWatchError::validation_field(
                    "Figure name cannot be empty",
                    "figures.name",
                ));
            }

            if !names.insert(figure.name.as_str()) {
                return Err(CountyWatchError::validation_field(
                    format!("Duplicate figure name '{}'", figure.name),
                    "figures.name",
                ));
            }

            if figure.output.as_os_str().is_empty() {
                return Err(CountyWatchError::validation_field(
                    format!("Figure '{}' has no output path", figure.name),
                    "figures.output",
                ));
            }

            if figure.regions.is_empty() {
                return Err(CountyWatchError::validation_field(
                    format!("Figure '{}' lists no regions", figure.name),
                    "figures.regions",
                ));
            }

            if let Some(entry) = figure
                .regions
                .iter()
                .find(|r| r.region.is_empty() || r.parent.is_empty())
            {
                return Err(CountyWatchError::validation_field(
                    format!(
                        "Figure '{}' has a region with an empty name ('{}', '{}')",
                        figure.name, entry.region, entry.parent
                    ),
                    "figures.regions",
                ));
            }
        }

        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RegionEntry;
    use proptest::prelude::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config::default();
        config.series.window = 0;

        let err = ConfigValidator::validate(&config).unwrap_err();
        match err {
            CountyWatchError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("series.window"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_sentinel_rejected() {
        let mut config = Config::default();
        config.series.saturation_sentinel = f64::INFINITY;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = Config::default();
        config.chart.doubling_rate_range = (14.0, 0.0);
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_background_color_checked() {
        let mut config = Config::default();
        config.chart.background_color = "white".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_figure_names_rejected() {
        let mut config = Config::default();
        let copy = config.figures[0].clone();
        config.figures.push(copy);
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_figure_without_regions_rejected() {
        let figure = FigureConfig {
            name: "empty".to_string(),
            output: PathBuf::from("empty.png"),
            title: None,
            regions: vec![],
        };
        assert!(ConfigValidator::validate_figures(&[figure]).is_err());
    }

    #[test]
    fn test_region_with_empty_parent_rejected() {
        let figure = FigureConfig {
            name: "bad".to_string(),
            output: PathBuf::from("bad.png"),
            title: None,
            regions: vec![RegionEntry::new("Kent", "", "r-")],
        };
        assert!(ConfigValidator::validate_figures(&[figure]).is_err());
    }

    proptest! {
        #[test]
        fn prop_any_positive_window_is_valid(window in 1usize..10_000) {
            let series = SeriesConfig { window, ..SeriesConfig::default() };
            prop_assert!(ConfigValidator::validate_series(&series).is_ok());
        }
    }
}
