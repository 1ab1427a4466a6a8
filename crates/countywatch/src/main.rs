//! Main entry point for County Watch.

use anyhow::{Context, Result};
use clap::Parser;
use countywatch::{Cli, Command, CountyWatch, RunError};
use countywatch_common::init_logging;
use countywatch_graphs::BatchPolicy;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.load_config().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file output is flushed on exit.
    let _logging_guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    info!(
        config = ?cli.config,
        data = %config.data.path.display(),
        window = config.series.window,
        figures = config.figures.len(),
        "Loaded configuration"
    );

    let app = CountyWatch::new(config).with_policy(if cli.fail_fast {
        BatchPolicy::FailFast
    } else {
        BatchPolicy::SkipMissing
    });

    match cli.action() {
        Command::List => {
            for line in app.describe_figures() {
                println!("{line}");
            }
            Ok(())
        }
        Command::Render => {
            info!("Starting County Watch");
            let summary = app
                .run(&cli.figures)
                .context("County Watch run failed")?;

            for report in &summary.figures {
                info!(
                    figure = %report.name,
                    path = %report.output.display(),
                    regions = report.rendered_regions.len(),
                    "Wrote figure"
                );
            }
            for region in summary.skipped_regions() {
                warn!(region = %region, "Region had no data and was skipped");
            }
            for (name, e) in &summary.failures {
                error!(figure = %name, "Figure failed: {e}");
            }

            if summary.is_success() {
                Ok(())
            } else {
                Err(RunError::FiguresFailed {
                    failed: summary.failures.len(),
                    total: summary.failures.len() + summary.figures.len(),
                }
                .into())
            }
        }
    }
}
