//! Application-wide error types using thiserror.

use countywatch_common::CountyWatchError;

/// Errors of a County Watch run.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    /// Configuration, dataset or rendering error from the library crates.
    #[error(transparent)]
    Core(#[from] CountyWatchError),

    /// A figure named on the command line is not configured.
    #[error("Unknown figure '{0}'")]
    UnknownFigure(String),

    /// Some figures could not be written.
    #[error("{failed} of {total} figures failed")]
    FiguresFailed {
        /// Figures that failed.
        failed: usize,
        /// Figures requested.
        total: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the application.
pub type RunResult<T> = Result<T, RunError>;
