//! # County Watch Graphs
//!
//! Per-region growth series and comparative chart rendering.
//!
//! The [`Dataset`] is loaded once and shared by reference. For each region a
//! [`RegionSeriesBuilder`] derives new cases, rolling averages and a
//! doubling-rate estimate; the [`ChartComposer`] draws the series of a
//! figure side by side using plotters. [`FigureManager`] ties the two
//! together for a batch of configured figures.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod composer;
pub mod dataset;
pub mod manager;
pub mod series;
pub mod style;
pub mod traits;
pub mod utils;

pub use builder::*;
pub use composer::*;
pub use dataset::*;
pub use manager::*;
pub use series::*;
pub use style::*;
pub use traits::*;
pub use utils::*;
