//! # County Watch Config
//!
//! Type-safe configuration management for County Watch.
//!
//! This crate provides the configuration schema (dataset location, series
//! parameters, chart layout, and the list of figures to render), its
//! defaults, file loading with environment overrides, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
