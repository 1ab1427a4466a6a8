//! Multi-panel comparative charts.
//!
//! A figure is a row of panels sharing the same regions and styles:
//! cumulative cases over time, the growth phase plot (rolling new cases
//! against rolling cumulative cases on log-log axes), and the doubling
//! rate over time on an inverted axis.

use crate::series::RegionSeries;
use crate::style::{DisplayStyle, StyleMap};
use crate::traits::FigureRenderer;
use crate::utils::GraphUtils;
use chrono::{NaiveDate, Weekday};
use countywatch_common::{format_iso_date, Result};
use countywatch_config::ChartConfig;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::Path;
use tracing::{debug, info, warn};

const LINE_WIDTH: u32 = 2;
const LABEL_FONT_SIZE: f64 = 14.0;
const AXIS_DESC_FONT: (&str, u32) = ("sans-serif", 16);
const TITLE_FONT: (&str, u32) = ("sans-serif", 26);

/// One panel of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Date against cumulative cases.
    CumulativeCases,
    /// Rolling cumulative against rolling new cases, both on log axes.
    GrowthPhase,
    /// Date against doubling rate, with shorter doubling times drawn higher.
    DoublingRate,
}

impl PanelKind {
    /// The three panels drawn by default, left to right.
    pub const DEFAULT_PANELS: [Self; 3] = [Self::CumulativeCases, Self::GrowthPhase, Self::DoublingRate];
}

/// Layout and axis settings of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    /// Panels, left to right.
    pub panels: Vec<PanelKind>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Caption above the panels.
    pub title: Option<String>,
    /// Weekday carrying the date axis ticks.
    pub tick_weekday: Weekday,
    /// Visible doubling-rate range `(min, max)`.
    pub doubling_rate_range: (f64, f64),
    /// Whether date labels are drawn vertically.
    pub rotate_date_labels: bool,
    /// Figure background.
    pub background_color: RGBColor,
}

impl Default for PanelSpec {
    fn default() -> Self {
        Self::from(&ChartConfig::default())
    }
}

impl From<&ChartConfig> for PanelSpec {
    fn from(chart: &ChartConfig) -> Self {
        Self {
            panels: PanelKind::DEFAULT_PANELS.to_vec(),
            width: chart.width,
            height: chart.height,
            title: None,
            tick_weekday: chart.tick_weekday,
            doubling_rate_range: chart.doubling_rate_range,
            rotate_date_labels: chart.rotate_date_labels,
            background_color: crate::style::parse_hex_color(&chart.background_color)
                .unwrap_or(WHITE),
        }
    }
}

impl PanelSpec {
    /// Returns the layout with a caption.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }
}

/// Image encoding picked from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raster image (`.png`, `.bmp`, `.jpg`, ...).
    Bitmap,
    /// Vector image (`.svg`).
    Svg,
}

impl OutputFormat {
    /// `.svg` selects the vector backend, anything else the raster one.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Bitmap,
        }
    }
}

/// Draws figures with plotters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartComposer;

impl ChartComposer {
    /// Creates a composer.
    pub const fn new() -> Self {
        Self
    }

    /// Writes a figure of `series` to `output_path`, creating the parent
    /// directory if needed. Empty series are skipped with a warning.
    pub fn compose(
        &self,
        output_path: &Path,
        series: &[RegionSeries],
        styles: &StyleMap,
        spec: &PanelSpec,
    ) -> Result<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let drawable: Vec<(DisplayStyle, &RegionSeries)> = series
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                if s.is_empty() {
                    warn!(region = %s.key(), "Skipping empty series");
                    None
                } else {
                    Some((styles.resolve(s.region_name(), i), s))
                }
            })
            .collect();

        let size = (spec.width, spec.height);
        match OutputFormat::from_path(output_path) {
            OutputFormat::Svg => {
                let root = SVGBackend::new(output_path, size).into_drawing_area();
                draw_figure(&root, &drawable, spec)?;
            }
            OutputFormat::Bitmap => {
                let root = BitMapBackend::new(output_path, size).into_drawing_area();
                draw_figure(&root, &drawable, spec)?;
            }
        }

        info!(
            path = %output_path.display(),
            series = drawable.len(),
            panels = spec.panels.len(),
            "Rendered figure"
        );
        Ok(())
    }
}

impl FigureRenderer for ChartComposer {
    fn render(
        &self,
        output_path: &Path,
        series: &[RegionSeries],
        styles: &StyleMap,
        spec: &PanelSpec,
    ) -> Result<()> {
        self.compose(output_path, series, styles, spec)
    }

    fn name(&self) -> &'static str {
        "plotters"
    }
}

/// Draws one series with its style and registers its legend entry.
macro_rules! draw_styled_series {
    ($chart:expr, $points:expr, $style:expr, $label:expr) => {{
        let stroke = ShapeStyle::from(&$style.color).stroke_width(LINE_WIDTH);
        let anno = match $style.line.dash_pattern() {
            None => $chart.draw_series(LineSeries::new($points, stroke))?,
            Some((size, spacing)) => {
                $chart.draw_series(DashedLineSeries::new($points, size, spacing, stroke))?
            }
        };
        anno.label($label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
    }};
}

fn draw_figure<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &[(DisplayStyle, &RegionSeries)],
    spec: &PanelSpec,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    root.fill(&spec.background_color)?;
    let root = match &spec.title {
        Some(title) => root.titled(title, TITLE_FONT)?,
        None => root.clone(),
    };

    let areas = root.split_evenly((1, spec.panels.len().max(1)));
    for (area, panel) in areas.iter().zip(&spec.panels) {
        debug!(?panel, "Drawing panel");
        match panel {
            PanelKind::CumulativeCases => draw_cumulative_panel(area, series, spec)?,
            PanelKind::GrowthPhase => draw_growth_panel(area, series)?,
            PanelKind::DoublingRate => draw_doubling_panel(area, series, spec)?,
        }
    }

    root.present()?;
    Ok(())
}

fn overall_span(series: &[(DisplayStyle, &RegionSeries)]) -> Option<(NaiveDate, NaiveDate)> {
    series
        .iter()
        .filter_map(|(_, s)| s.date_span())
        .reduce(|(a_start, a_end), (b_start, b_end)| (a_start.min(b_start), a_end.max(b_end)))
}

fn date_label_style(spec: &PanelSpec) -> TextStyle<'static> {
    let font = FontDesc::new(FontFamily::SansSerif, LABEL_FONT_SIZE, FontStyle::Normal);
    if spec.rotate_date_labels {
        font.transform(FontTransform::Rotate90).into()
    } else {
        font.into()
    }
}

fn draw_cumulative_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    series: &[(DisplayStyle, &RegionSeries)],
    spec: &PanelSpec,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let (start, end) = GraphUtils::date_range(overall_span(series));
    let max = series
        .iter()
        .filter_map(|(_, s)| s.points().iter().map(|p| p.cumulative_cases).max())
        .max()
        .unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let (y_min, y_max) = GraphUtils::linear_range(max as f64);
    let ticks = GraphUtils::weekday_ticks(start, end, spec.tick_weekday);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(if spec.rotate_date_labels { 90 } else { 40 })
        .y_label_area_size(70)
        .build_cartesian_2d((start..end).with_key_points(ticks), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|d: &NaiveDate| format_iso_date(*d))
        .x_label_style(date_label_style(spec))
        .y_label_formatter(&|v: &f64| format!("{v:.0}"))
        .x_desc("Date")
        .y_desc("Total Cases")
        .axis_desc_style(AXIS_DESC_FONT)
        .draw()?;

    for (style, s) in series {
        draw_styled_series!(chart, s.cumulative_points(), style, s.region_name());
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_growth_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    series: &[(DisplayStyle, &RegionSeries)],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let points: Vec<(DisplayStyle, &RegionSeries, Vec<(f64, f64)>)> = series
        .iter()
        .map(|(style, s)| (*style, *s, s.growth_phase_points()))
        .collect();

    let (x_min, x_max) = GraphUtils::log_range(points.iter().flat_map(|(_, _, p)| p.iter().map(|(x, _)| *x)));
    let (y_min, y_max) = GraphUtils::log_range(points.iter().flat_map(|(_, _, p)| p.iter().map(|(_, y)| *y)));

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((x_min..x_max).log_scale(), (y_min..y_max).log_scale())?;

    chart
        .configure_mesh()
        .x_label_formatter(&|v: &f64| format!("{v:.0}"))
        .y_label_formatter(&|v: &f64| format!("{v:.0}"))
        .x_desc("Total Cases")
        .y_desc("New Cases")
        .axis_desc_style(AXIS_DESC_FONT)
        .draw()?;

    for (style, s, growth) in points {
        if growth.is_empty() {
            debug!(region = %s.key(), "No positive growth-phase points");
        }
        draw_styled_series!(chart, growth, style, s.region_name());
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_doubling_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    series: &[(DisplayStyle, &RegionSeries)],
    spec: &PanelSpec,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let (start, end) = GraphUtils::date_range(overall_span(series));
    let range = spec.doubling_rate_range;
    let ticks = GraphUtils::weekday_ticks(start, end, spec.tick_weekday);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(if spec.rotate_date_labels { 90 } else { 40 })
        .y_label_area_size(70)
        .build_cartesian_2d((start..end).with_key_points(ticks), range.0..range.1)?;

    // Values are drawn mirrored, so labels mirror them back.
    let unflip = move |v: &f64| format!("{:.0}", GraphUtils::invert_within(*v, range));
    chart
        .configure_mesh()
        .x_label_formatter(&|d: &NaiveDate| format_iso_date(*d))
        .x_label_style(date_label_style(spec))
        .y_label_formatter(&unflip)
        .x_desc("Date")
        .y_desc("Doubling Rate (doubles every X days)")
        .axis_desc_style(AXIS_DESC_FONT)
        .draw()?;

    for (style, s) in series {
        let points: Vec<(NaiveDate, f64)> = s
            .doubling_rate_points()
            .into_iter()
            .map(|(date, rate)| (date, GraphUtils::invert_within(rate, range)))
            .collect();
        draw_styled_series!(chart, points, style, s.region_name());
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RegionSeriesBuilder;
    use crate::dataset::Dataset;
    use countywatch_common::test_utils::{fixtures, init_test_logging};
    use countywatch_common::RegionKey;
    use tempfile::TempDir;

    fn sample_series() -> Vec<RegionSeries> {
        let dataset = Dataset::from_records(fixtures::sample_records());
        let builder = RegionSeriesBuilder::default();
        ["Kent", "Wayne"]
            .iter()
            .map(|name| {
                builder
                    .build(&dataset, &RegionKey::new(*name, "Michigan"), 3)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a.svg")), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.SVG")), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.png")), OutputFormat::Bitmap);
        assert_eq!(OutputFormat::from_path(Path::new("a")), OutputFormat::Bitmap);
    }

    #[test]
    fn test_panel_spec_from_chart_config() {
        let spec = PanelSpec::from(&ChartConfig::default());
        assert_eq!(spec.panels.len(), 3);
        assert_eq!((spec.width, spec.height), (1400, 500));
        assert_eq!(spec.background_color, WHITE);
        assert_eq!(spec.tick_weekday, Weekday::Sun);
        assert!(spec.title.is_none());
    }

    #[test]
    fn test_compose_png() {
        init_test_logging();
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("nested").join("michigan.png");

        let styles = StyleMap::from_entries(&[
            countywatch_config::RegionEntry::new("Kent", "Michigan", "r-"),
            countywatch_config::RegionEntry::new("Wayne", "Michigan", "b--"),
        ])
        .unwrap();
        let spec = PanelSpec::default().with_title(Some("Michigan".to_string()));

        let result = ChartComposer::new().compose(&output_path, &sample_series(), &styles, &spec);
        assert!(result.is_ok(), "Failed to render figure: {result:?}");
        assert!(output_path.exists());

        let metadata = std::fs::metadata(&output_path).unwrap();
        assert!(metadata.len() > 1000, "Rendered file is too small");
    }

    #[test]
    fn test_compose_svg_with_empty_series() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("figure.svg");

        let mut series = sample_series();
        series.push(RegionSeries::new(RegionKey::new("Empty", "Nowhere"), 3, Vec::new()));

        let spec = PanelSpec {
            rotate_date_labels: false,
            ..PanelSpec::default()
        };
        ChartComposer::new()
            .compose(&output_path, &series, &StyleMap::new(), &spec)
            .unwrap();

        let svg = std::fs::read_to_string(&output_path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Kent"));
        assert!(!svg.contains("Empty"));
    }

    #[test]
    fn test_compose_without_series() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("blank.svg");

        ChartComposer::new()
            .compose(&output_path, &[], &StyleMap::new(), &PanelSpec::default())
            .unwrap();
        assert!(output_path.exists());
    }

    #[test]
    fn test_single_panel_layout() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("doubling.svg");
        let spec = PanelSpec {
            panels: vec![PanelKind::DoublingRate],
            width: 600,
            ..PanelSpec::default()
        };

        ChartComposer::new()
            .compose(&output_path, &sample_series(), &StyleMap::new(), &spec)
            .unwrap();
        let svg = std::fs::read_to_string(&output_path).unwrap();
        assert!(svg.contains("Doubling Rate"));
        assert!(!svg.contains("Total Cases"));
    }
}
