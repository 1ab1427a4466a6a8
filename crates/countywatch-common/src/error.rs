//! Error types and utilities for County Watch

use thiserror::Error;

/// Result type alias for County Watch operations
pub type Result<T> = std::result::Result<T, CountyWatchError>;

/// Main error type for County Watch operations
#[derive(Error, Debug)]
pub enum CountyWatchError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader errors while loading the dataset
    #[error("CSV error: {message}")]
    Csv {
        /// Human readable description
        message: String,
        /// 1-based line in the source file, when known
        line: Option<u64>,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A dataset row that parsed as CSV but holds an unusable value
    #[error("Data error: {message}")]
    Data {
        /// Human readable description
        message: String,
        /// 1-based line in the source file, when known
        line: Option<u64>,
    },

    /// No records matched the requested region and parent region
    #[error("No records for region '{region_name}' in '{parent_region}'")]
    MissingRegion {
        /// County (or other region) name that was requested
        region_name: String,
        /// State (or other parent region) name that was requested
        parent_region: String,
    },

    /// Chart composition and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for configuration values or parameters
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Offending field, when known
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CountyWatchError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new data error for a malformed row
    pub fn data(msg: impl Into<String>, line: Option<u64>) -> Self {
        Self::Data {
            message: msg.into(),
            line,
        }
    }

    /// Create a missing region error
    pub fn missing_region(region_name: impl Into<String>, parent_region: impl Into<String>) -> Self {
        Self::MissingRegion {
            region_name: region_name.into(),
            parent_region: parent_region.into(),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error only affects a single region and the caller may
    /// continue with the remaining ones.
    pub const fn is_region_scoped(&self) -> bool {
        matches!(self, Self::MissingRegion { .. })
    }
}

// Error conversion implementations for external types

/// Convert from csv::Error to CountyWatchError, keeping the line number
impl From<csv::Error> for CountyWatchError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        Self::Csv {
            message: err.to_string(),
            line,
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from serde_yaml::Error to CountyWatchError
impl From<serde_yaml::Error> for CountyWatchError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

/// Convert from toml::de::Error to CountyWatchError
impl From<toml::de::Error> for CountyWatchError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to CountyWatchError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for CountyWatchError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Chart rendering failed", err)
    }
}
