//! Run orchestration: figure selection, dataset loading and rendering.

use crate::error::{RunError, RunResult};
use countywatch_config::{Config, FigureConfig};
use countywatch_graphs::{
    BatchPolicy, ChartComposer, Dataset, DoublingRatePolicy, FigureManager, PanelSpec,
    RegionSeriesBuilder, RunSummary, StyleMap,
};
use std::sync::Arc;
use tracing::{info, warn};

/// A configured County Watch run.
pub struct CountyWatch {
    config: Arc<Config>,
    policy: BatchPolicy,
}

impl CountyWatch {
    /// Creates a run over an already validated configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            policy: BatchPolicy::default(),
        }
    }

    /// Sets the missing-region policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The figures named in `names`, in the given order, or every
    /// configured figure when `names` is empty.
    pub fn select_figures(&self, names: &[String]) -> RunResult<Vec<FigureConfig>> {
        if names.is_empty() {
            return Ok(self.config.figures.clone());
        }

        names
            .iter()
            .map(|name| {
                self.config
                    .figure(name)
                    .cloned()
                    .ok_or_else(|| RunError::UnknownFigure(name.clone()))
            })
            .collect()
    }

    /// One line per figure: name, output path and regions with styles.
    pub fn describe_figures(&self) -> Vec<String> {
        self.config
            .figures
            .iter()
            .map(|figure| {
                let regions: Vec<String> = figure
                    .regions
                    .iter()
                    .map(|r| format!("{}, {} [{}]", r.region, r.parent, r.style))
                    .collect();
                format!(
                    "{} -> {}: {}",
                    figure.name,
                    figure.output_path(&self.config.chart.output_dir).display(),
                    regions.join("; ")
                )
            })
            .collect()
    }

    /// Renders the selected figures.
    ///
    /// Style tokens are checked before the dataset is read. Returns the
    /// summary even when some figures failed; it is up to the caller to
    /// turn failures into an exit status.
    pub fn run(&self, figure_names: &[String]) -> RunResult<RunSummary> {
        let figures = self.select_figures(figure_names)?;
        for figure in &figures {
            StyleMap::from_entries(&figure.regions)?;
        }

        let output_dir = &self.config.chart.output_dir;
        std::fs::create_dir_all(output_dir)?;

        let dataset = Dataset::from_csv_path(&self.config.data.path)?;
        if dataset.is_empty() {
            warn!(path = %self.config.data.path.display(), "Dataset has no rows");
        }

        let manager = FigureManager::new(
            &dataset,
            RegionSeriesBuilder::new(DoublingRatePolicy::from(&self.config.series)),
            self.config.series.window,
            ChartComposer::new(),
            PanelSpec::from(&self.config.chart),
        )
        .with_policy(self.policy);

        info!(
            figures = figures.len(),
            window = self.config.series.window,
            output_dir = %output_dir.display(),
            "Rendering figures"
        );
        Ok(manager.render_all(&figures, output_dir)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countywatch_config::RegionEntry;

    #[test]
    fn test_select_figures() {
        let app = CountyWatch::new(Config::default());

        assert_eq!(app.select_figures(&[]).unwrap().len(), 6);

        let selected = app
            .select_figures(&["nyc".to_string(), "georgia".to_string()])
            .unwrap();
        let names: Vec<&str> = selected.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["nyc", "georgia"]);

        assert!(matches!(
            app.select_figures(&["texas".to_string()]),
            Err(RunError::UnknownFigure(name)) if name == "texas"
        ));
    }

    #[test]
    fn test_describe_figures() {
        let app = CountyWatch::new(Config::default());
        let lines = app.describe_figures();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("michigan -> "));
        assert!(lines[0].contains("Kent, Michigan [r-]"));
    }

    #[test]
    fn test_bad_style_rejected_before_loading_data() {
        let mut config = Config::default();
        config.data.path = "does/not/exist.csv".into();
        config.chart.output_dir = std::env::temp_dir();
        config.figures[0].regions[0] = RegionEntry::new("Kent", "Michigan", "bogus");

        let err = CountyWatch::new(config)
            .run(&["michigan".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("bogus"), "{err}");
    }
}
