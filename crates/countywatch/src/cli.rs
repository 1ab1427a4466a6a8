//! Command line interface.

use crate::error::RunResult;
use clap::{Parser, Subcommand};
use countywatch_common::CountyWatchError;
use countywatch_config::{Config, ConfigLoader, ConfigValidator};
use std::path::PathBuf;

/// Per-county case growth charts from cumulative case counts
#[derive(Debug, Parser)]
#[command(name = "countywatch", version, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(short, long, env = "COUNTYWATCH_CONFIG_PATH", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// County-level CSV dataset, overriding the configured path
    #[arg(short, long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Directory figures are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Rolling average window, in observations
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Only render the named figure (repeatable)
    #[arg(short, long = "figure", value_name = "NAME")]
    pub figures: Vec<String>,

    /// Abort on the first missing region or failed figure
    #[arg(long)]
    pub fail_fast: bool,

    /// Log level or filter directive (e.g. "debug")
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// What to do; renders figures when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Render the configured figures
    Render,
    /// List the configured figures and their regions
    List,
}

impl Cli {
    /// Applies the command line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.data.path.clone_from(data);
        }
        if let Some(dir) = &self.output_dir {
            config.chart.output_dir.clone_from(dir);
        }
        if let Some(window) = self.window {
            config.series.window = window;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if let Some(file) = &self.log_file {
            config.logging.file_path = Some(file.clone());
        }
    }

    /// Reads the configuration file (or the defaults), then applies
    /// environment and command line overrides before validating once.
    pub fn load_config(&self) -> RunResult<Config> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::read_file(path),
            None => ConfigLoader::read(),
        }
        .map_err(CountyWatchError::from)?;

        self.apply_overrides(&mut config);
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// The subcommand to run.
    pub fn action(&self) -> Command {
        self.command.unwrap_or(Command::Render)
    }
}
