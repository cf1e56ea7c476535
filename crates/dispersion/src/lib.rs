//! Street-level screening of traffic emissions around a signalized
//! intersection.
//!
//! Per-lane emission rates are cut into point sources along each lane,
//! filtered to the downwind sector of every evaluation point, turned into
//! concentrations with a box screening model and summed under any number of
//! declarative groupings.

pub mod aggregate;
pub mod concentration;
pub mod config;
pub mod decompose;
pub mod downwind;
pub mod engine;
pub mod error;
pub mod feed;
pub mod geometry;
pub mod grid_sampler;
pub mod plugin;
pub mod points;
pub mod pollutant;
pub mod synthetic;
pub mod time_bucket;

pub use aggregate::{AggregatedResult, Aggregator, Grouping, KeyField};
pub use engine::{DispersionEngine, RunWarnings, ScreeningConfig, ScreeningReport};
pub use error::{ConfigError, InputParseError, ScreeningError, UnknownLaneError};
pub use feed::{parse_feed, EmissionRecord};
pub use geometry::{LaneGeometryRegistry, LaneSpec};
pub use plugin::{DispersionPlugin, PendingEmissions, ScreeningEngine, ScreeningResults};
pub use pollutant::Pollutant;
