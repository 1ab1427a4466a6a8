//! # County Watch Common
//!
//! Shared types, errors, and logging setup for County Watch.
//!
//! This crate provides the foundational types used across the other crates
//! in the workspace: the raw dataset record, the region key used to select
//! a county, the workspace error type, and the tracing subscriber setup.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{CountyWatchError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingGuard};
pub use types::*;
pub use utils::*;
