use std::fmt;

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::UNIT_VECTOR_TOLERANCE;
use crate::error::ConfigError;

/// Intersection arm a lane belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    North,
    South,
    East,
    West,
}

impl Approach {
    pub fn name(self) -> &'static str {
        match self {
            Approach::North => "North",
            Approach::South => "South",
            Approach::East => "East",
            Approach::West => "West",
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether traffic on a lane moves into or out of the intersection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Inbound,
    Outbound,
    #[default]
    Unspecified,
}

impl Flow {
    pub fn name(self) -> &'static str {
        match self {
            Flow::Inbound => "In",
            Flow::Outbound => "Out",
            Flow::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a lane's first segment starts relative to the intersection origin.
///
/// `Midpoint` centres the lane on the origin so it spans `[-L/2, +L/2]`
/// along its direction. `Origin` starts the lane at the origin and runs it
/// a full length along its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorConvention {
    #[default]
    Midpoint,
    Origin,
}

impl AnchorConvention {
    /// Start point of a lane of `length` metres running along `direction`.
    pub fn start_point(self, direction: DVec2, length: f64) -> DVec2 {
        match self {
            AnchorConvention::Midpoint => direction * (-0.5 * length),
            AnchorConvention::Origin => DVec2::ZERO,
        }
    }
}

/// Static geometry of one lane.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSpec {
    id: String,
    direction: DVec2,
    length: f64,
    approach: Approach,
    flow: Flow,
}

impl LaneSpec {
    /// Builds a lane, normalizing `direction` to unit length.
    pub fn new(
        id: impl Into<String>,
        direction: DVec2,
        length: f64,
        approach: Approach,
        flow: Flow,
    ) -> Result<Self, ConfigError> {
        let id = id.into();
        if !direction.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "lane.direction",
            });
        }
        if !length.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "lane.length",
            });
        }
        if length < 0.0 {
            return Err(ConfigError::NegativeLength { lane: id, length });
        }
        let norm = direction.length();
        if norm == 0.0 {
            return Err(ConfigError::ZeroDirection { lane: id });
        }
        let direction = if (norm - 1.0).abs() <= UNIT_VECTOR_TOLERANCE {
            direction
        } else {
            direction / norm
        };
        Ok(Self {
            id,
            direction,
            length,
            approach,
            flow,
        })
    }

    /// Axis-aligned lane from a trusted static table.
    pub(crate) fn axis(id: &str, dx: f64, dy: f64, length: f64, approach: Approach, flow: Flow) -> Self {
        Self {
            id: id.to_string(),
            direction: DVec2::new(dx, dy),
            length,
            approach,
            flow,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn approach(&self) -> Approach {
        self.approach
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Start and end points of the lane centreline under `anchor`.
    pub fn endpoints(&self, anchor: AnchorConvention) -> (DVec2, DVec2) {
        let start = anchor.start_point(self.direction, self.length);
        (start, start + self.direction * self.length)
    }
}

/// Lane entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSpecConfig {
    pub id: String,
    pub direction: [f64; 2],
    pub length: f64,
    pub approach: Approach,
    #[serde(default)]
    pub flow: Flow,
}

impl LaneSpecConfig {
    pub fn to_spec(&self) -> Result<LaneSpec, ConfigError> {
        LaneSpec::new(
            self.id.clone(),
            DVec2::new(self.direction[0], self.direction[1]),
            self.length,
            self.approach,
            self.flow,
        )
    }
}
