//! ScreeningConfig: every tunable of a run in one serde document.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Grouping, KeyField};
use crate::config::{
    DEFAULT_BUCKET_SECONDS, DEFAULT_HALF_ANGLE_DEG, DEFAULT_LATERAL_SPREAD_FACTOR,
    DEFAULT_MIN_DISTANCE_M, DEFAULT_MIXING_HEIGHT_M, DEFAULT_SEGMENTS_PER_LANE,
    DEFAULT_WIND_SPEED_M_S,
};
use crate::downwind::WindConvention;
use crate::error::ConfigError;
use crate::geometry::{AnchorConvention, LaneGeometryRegistry, LaneSpecConfig};
use crate::grid_sampler::{self, GridSpec};
use crate::points::{EvaluationPoint, ReceptorConfig};

/// Wind and mixing layer for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindParams {
    /// m/s.
    pub speed: f64,
    /// m.
    pub mixing_height: f64,
    /// Degrees, read according to `convention`.
    pub direction_deg: f64,
    pub half_angle_deg: f64,
    pub convention: WindConvention,
}

impl Default for WindParams {
    fn default() -> Self {
        Self {
            speed: DEFAULT_WIND_SPEED_M_S,
            mixing_height: DEFAULT_MIXING_HEIGHT_M,
            direction_deg: 0.0,
            half_angle_deg: DEFAULT_HALF_ANGLE_DEG,
            convention: WindConvention::From,
        }
    }
}

/// Discrete receptors or a dense grid; never both in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    Receptors(Vec<ReceptorConfig>),
    Grid(GridSpec),
}

impl Default for EvaluationMode {
    /// Intersection centre plus one receptor on the east and north arms.
    fn default() -> Self {
        EvaluationMode::Receptors(vec![
            ReceptorConfig::at(0.0, 0.0),
            ReceptorConfig::at(20.0, 0.0),
            ReceptorConfig::at(0.0, 30.0),
        ])
    }
}

impl EvaluationMode {
    pub fn points(&self) -> Result<Vec<EvaluationPoint>, ConfigError> {
        match self {
            EvaluationMode::Receptors(list) => {
                if list.is_empty() {
                    return Err(ConfigError::NoEvaluationPoints);
                }
                list.iter()
                    .enumerate()
                    .map(|(idx, cfg)| {
                        if cfg.position.iter().all(|v| v.is_finite()) {
                            Ok(EvaluationPoint::from(cfg.to_receptor(idx)))
                        } else {
                            Err(ConfigError::NonFinite {
                                field: "receptor.position",
                            })
                        }
                    })
                    .collect()
            }
            EvaluationMode::Grid(spec) => Ok(grid_sampler::generate(spec)?
                .into_iter()
                .map(EvaluationPoint::from)
                .collect()),
        }
    }
}

/// Run configuration. Loaded once at startup and inserted into the world
/// as a resource; every field has a default.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub wind: WindParams,
    pub lateral_spread_factor: f64,
    /// Distances below this (m) are clamped before use.
    pub min_distance: f64,
    pub segments_per_lane: u32,
    pub anchor: AnchorConvention,
    pub bucket_seconds: u32,
    pub mode: EvaluationMode,
    pub groupings: Vec<Vec<KeyField>>,
    /// Lane table; empty means the surveyed reference intersection.
    pub lanes: Vec<LaneSpecConfig>,
    /// Extra `alias → lane id` entries, e.g. feed edge ids.
    pub aliases: BTreeMap<String, String>,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            wind: WindParams::default(),
            lateral_spread_factor: DEFAULT_LATERAL_SPREAD_FACTOR,
            min_distance: DEFAULT_MIN_DISTANCE_M,
            segments_per_lane: DEFAULT_SEGMENTS_PER_LANE,
            anchor: AnchorConvention::default(),
            bucket_seconds: DEFAULT_BUCKET_SECONDS,
            mode: EvaluationMode::default(),
            groupings: Grouping::default_fields(),
            lanes: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

impl ScreeningConfig {
    /// Parses a JSON document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ScreeningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every scalar parameter. Lanes, points and groupings are
    /// checked when they are built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments_per_lane == 0 {
            return Err(ConfigError::InvalidSegmentCount(self.segments_per_lane));
        }
        for (field, value) in [
            ("wind.speed", self.wind.speed),
            ("wind.mixing_height", self.wind.mixing_height),
            ("lateral_spread_factor", self.lateral_spread_factor),
            ("min_distance", self.min_distance),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !self.wind.direction_deg.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "wind.direction_deg",
            });
        }
        let half = self.wind.half_angle_deg;
        if !(0.0..=180.0).contains(&half) {
            return Err(ConfigError::HalfAngleOutOfRange(half));
        }
        if self.bucket_seconds == 0 {
            return Err(ConfigError::NonPositive {
                field: "bucket_seconds",
                value: 0.0,
            });
        }
        if let EvaluationMode::Grid(spec) = &self.mode {
            spec.validate()?;
        }
        Ok(())
    }

    pub fn build_registry(&self) -> Result<LaneGeometryRegistry, ConfigError> {
        if self.lanes.is_empty() {
            LaneGeometryRegistry::reference_intersection().with_aliases(&self.aliases)
        } else {
            LaneGeometryRegistry::from_config(&self.lanes, &self.aliases)
        }
    }

    pub fn build_groupings(&self) -> Result<Vec<Grouping>, ConfigError> {
        Grouping::list(&self.groupings)
    }
}
