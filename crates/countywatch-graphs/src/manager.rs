//! Figure manager for orchestrating a batch of figures over one dataset.

use crate::builder::RegionSeriesBuilder;
use crate::composer::PanelSpec;
use crate::dataset::Dataset;
use crate::series::RegionSeries;
use crate::style::StyleMap;
use crate::traits::FigureRenderer;
use countywatch_common::{CountyWatchError, RegionKey, Result};
use countywatch_config::FigureConfig;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// What a missing region does to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Leave the region out of its figure and carry on.
    #[default]
    SkipMissing,
    /// Stop at the first error of any kind.
    FailFast,
}

/// Outcome of one rendered figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureReport {
    /// Figure name.
    pub name: String,
    /// Written file.
    pub output: PathBuf,
    /// Regions drawn.
    pub rendered_regions: Vec<RegionKey>,
    /// Regions left out because the dataset had no rows for them.
    pub skipped_regions: Vec<RegionKey>,
}

/// Outcome of a batch.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Figures written.
    pub figures: Vec<FigureReport>,
    /// Figures that could not be written, with the reason.
    pub failures: Vec<(String, CountyWatchError)>,
}

impl RunSummary {
    /// Whether every requested figure was written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Regions skipped across all written figures.
    pub fn skipped_regions(&self) -> impl Iterator<Item = &RegionKey> {
        self.figures.iter().flat_map(|f| f.skipped_regions.iter())
    }
}

/// Builds the series of each figure from a shared dataset and hands them to
/// a renderer.
pub struct FigureManager<'a, R: FigureRenderer> {
    dataset: &'a Dataset,
    builder: RegionSeriesBuilder,
    window: usize,
    renderer: R,
    panel_spec: PanelSpec,
    policy: BatchPolicy,
}

impl<'a, R: FigureRenderer> FigureManager<'a, R> {
    /// Creates a manager with the default batch policy.
    pub fn new(
        dataset: &'a Dataset,
        builder: RegionSeriesBuilder,
        window: usize,
        renderer: R,
        panel_spec: PanelSpec,
    ) -> Self {
        Self {
            dataset,
            builder,
            window,
            renderer,
            panel_spec,
            policy: BatchPolicy::default(),
        }
    }

    /// Sets the batch policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The renderer figures are handed to.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Builds the series of every region of `figure`, in configuration
    /// order. Returns the built series and the keys of skipped regions.
    pub fn build_series(&self, figure: &FigureConfig) -> Result<(Vec<RegionSeries>, Vec<RegionKey>)> {
        let mut series = Vec::with_capacity(figure.regions.len());
        let mut skipped = Vec::new();

        for entry in &figure.regions {
            let key = entry.key();
            match self.builder.build(self.dataset, &key, self.window) {
                Ok(built) => series.push(built),
                Err(e) if e.is_region_scoped() && self.policy == BatchPolicy::SkipMissing => {
                    warn!(figure = %figure.name, region = %key, "Skipping region: {e}");
                    skipped.push(key);
                }
                Err(e) => return Err(e),
            }
        }

        Ok((series, skipped))
    }

    /// Renders one figure into `output_dir`.
    pub fn render_figure(&self, figure: &FigureConfig, output_dir: &Path) -> Result<FigureReport> {
        let styles = StyleMap::from_entries(&figure.regions)?;
        let (series, skipped_regions) = self.build_series(figure)?;

        if series.is_empty() {
            return Err(CountyWatchError::graph(format!(
                "Figure '{}' has no regions with data",
                figure.name
            )));
        }

        let output = figure.output_path(output_dir);
        let spec = self.panel_spec.clone().with_title(figure.title.clone());
        self.renderer.render(&output, &series, &styles, &spec)?;

        info!(
            figure = %figure.name,
            path = %output.display(),
            regions = series.len(),
            skipped = skipped_regions.len(),
            renderer = self.renderer.name(),
            "Figure written"
        );

        Ok(FigureReport {
            name: figure.name.clone(),
            output,
            rendered_regions: series.iter().map(|s| s.key().clone()).collect(),
            skipped_regions,
        })
    }

    /// Renders every figure. A failing figure is recorded in the summary
    /// and the rest still render, unless the policy is `FailFast`.
    pub fn render_all(&self, figures: &[FigureConfig], output_dir: &Path) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for figure in figures {
            match self.render_figure(figure, output_dir) {
                Ok(report) => summary.figures.push(report),
                Err(e) if self.policy == BatchPolicy::FailFast => return Err(e),
                Err(e) => {
                    error!(figure = %figure.name, "Figure failed: {e}");
                    summary.failures.push((figure.name.clone(), e));
                }
            }
        }

        info!(
            written = summary.figures.len(),
            failed = summary.failures.len(),
            "Batch complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countywatch_common::test_utils::{fixtures, init_test_logging};
    use countywatch_config::RegionEntry;
    use std::cell::RefCell;

    /// Records what it is asked to draw instead of drawing it.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<(PathBuf, Vec<String>, Option<String>)>>,
    }

    impl FigureRenderer for RecordingRenderer {
        fn render(
            &self,
            output_path: &Path,
            series: &[RegionSeries],
            _styles: &StyleMap,
            spec: &PanelSpec,
        ) -> Result<()> {
            self.calls.borrow_mut().push((
                output_path.to_path_buf(),
                series.iter().map(|s| s.region_name().to_string()).collect(),
                spec.title.clone(),
            ));
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn figure(name: &str, regions: Vec<RegionEntry>) -> FigureConfig {
        FigureConfig {
            name: name.to_string(),
            output: PathBuf::from(format!("{name}.png")),
            title: Some(name.to_uppercase()),
            regions,
        }
    }

    fn manager(dataset: &Dataset) -> FigureManager<'_, RecordingRenderer> {
        FigureManager::new(
            dataset,
            RegionSeriesBuilder::default(),
            3,
            RecordingRenderer::default(),
            PanelSpec::default(),
        )
    }

    #[test]
    fn test_missing_region_is_skipped() {
        init_test_logging();
        let dataset = Dataset::from_records(fixtures::sample_records());
        let manager = manager(&dataset);
        let michigan = figure(
            "michigan",
            vec![
                RegionEntry::new("Kent", "Michigan", "r-"),
                RegionEntry::new("Washtenaw", "Michigan", "b-"),
                RegionEntry::new("Wayne", "Michigan", "b--"),
            ],
        );

        let report = manager.render_figure(&michigan, Path::new("out")).unwrap();

        assert_eq!(report.output, PathBuf::from("out/michigan.png"));
        assert_eq!(report.rendered_regions.len(), 2);
        assert_eq!(
            report.skipped_regions,
            vec![RegionKey::new("Washtenaw", "Michigan")]
        );

        let calls = manager.renderer().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, vec!["Kent".to_string(), "Wayne".to_string()]);
        assert_eq!(calls[0].2.as_deref(), Some("MICHIGAN"));
    }

    #[test]
    fn test_fail_fast_stops_on_missing_region() {
        let dataset = Dataset::from_records(fixtures::sample_records());
        let manager = manager(&dataset).with_policy(BatchPolicy::FailFast);
        let figures = vec![figure(
            "ohio",
            vec![RegionEntry::new("Kent", "Ohio", "r-")],
        )];

        let err = manager.render_all(&figures, Path::new("out")).unwrap_err();
        assert!(err.is_region_scoped());
        assert!(manager.renderer().calls.borrow().is_empty());
    }

    #[test]
    fn test_failed_figure_does_not_stop_batch() {
        let dataset = Dataset::from_records(fixtures::sample_records());
        let manager = manager(&dataset);
        let figures = vec![
            figure("ohio", vec![RegionEntry::new("Kent", "Ohio", "r-")]),
            figure("delaware", vec![RegionEntry::new("Kent", "Delaware", "g-")]),
            figure("bad-style", vec![RegionEntry::new("Wayne", "Michigan", "zz")]),
        ];

        let summary = manager.render_all(&figures, Path::new("out")).unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.figures.len(), 1);
        assert_eq!(summary.figures[0].name, "delaware");
        let failed: Vec<&str> = summary.failures.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(failed, vec!["ohio", "bad-style"]);
        assert_eq!(summary.skipped_regions().count(), 0);
    }
}
