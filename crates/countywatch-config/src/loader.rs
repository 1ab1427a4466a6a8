//! Configuration loading utilities

use crate::{Config, ConfigValidator};
use countywatch_common::{CountyWatchError, Result as CountyWatchResult};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "COUNTYWATCH_CONFIG_PATH";

/// Files looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 3] =
    ["countywatch.yaml", "countywatch.yml", "countywatch.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading or writing the configuration file
    #[error("Failed to access configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to serialize TOML configuration: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// The file extension does not name a supported format
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parser message
        message: String,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[source] CountyWatchError),
}

impl From<ConfigError> for CountyWatchError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(inner) => inner,
            other => Self::config_with_source(other.to_string(), other),
        }
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let config = Self::read_file(path.as_ref())?;
        ConfigValidator::validate(&config).map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// Parse a configuration file and apply environment overrides, leaving
    /// validation to the caller so later overrides can still fix a value.
    pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let mut config = Self::parse_file(path)?;
        Self::apply_env_overrides(&mut config)?;
        debug!(path = %path.display(), figures = config.figures.len(), "Read configuration");
        Ok(config)
    }

    /// Like [`ConfigLoader::load`], without validation.
    pub fn read() -> Result<Config, ConfigError> {
        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            return Self::read_file(Path::new(&config_path));
        }

        if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
        {
            return Self::read_file(path);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Looks at `COUNTYWATCH_CONFIG_PATH`, then the default file names in
    /// the working directory, and falls back to the built-in defaults.
    pub fn load() -> CountyWatchResult<Config> {
        let config = Self::read()?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CountyWatchResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Parse a configuration file without overrides or validation
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content, format)
    }

    /// Parse configuration text in the given format
    pub fn parse_str(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        match format {
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
        }
    }

    /// Save configuration to a file, in the format named by its extension
    pub fn save_to_file<P: AsRef<Path>>(config: &Config, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Yaml => serde_yaml::to_string(config)?,
            ConfigFormat::Toml => toml::to_string_pretty(config)?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply process environment overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`.
    ///
    /// Recognised variables: `COUNTYWATCH_DATA_PATH`, `COUNTYWATCH_WINDOW`,
    /// `COUNTYWATCH_SENTINEL`, `COUNTYWATCH_OUTPUT_DIR`,
    /// `COUNTYWATCH_LOG_LEVEL`.
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("COUNTYWATCH_DATA_PATH") {
            config.data.path = PathBuf::from(path);
        }

        if let Some(window) = lookup("COUNTYWATCH_WINDOW") {
            config.series.window = parse_var("COUNTYWATCH_WINDOW", &window)?;
        }

        if let Some(sentinel) = lookup("COUNTYWATCH_SENTINEL") {
            config.series.saturation_sentinel = parse_var("COUNTYWATCH_SENTINEL", &sentinel)?;
        }

        if let Some(dir) = lookup("COUNTYWATCH_OUTPUT_DIR") {
            config.chart.output_dir = PathBuf::from(dir);
        }

        if let Some(level) = lookup("COUNTYWATCH_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvParseError {
        var: var.to_string(),
        message: e.to_string(),
    })
}
