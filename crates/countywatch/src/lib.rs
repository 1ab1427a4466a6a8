//! # County Watch
//!
//! Renders per-county case growth figures from a cumulative case-count
//! dataset.
//!
//! This is the main binary crate: it reads the configuration and command
//! line, loads the dataset once, and renders every selected figure.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
