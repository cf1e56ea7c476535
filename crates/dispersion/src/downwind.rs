//! Downwind sector test.
//!
//! Bearings are measured in the geometry's own frame: degrees
//! counter-clockwise from the +x axis, normalized to [0, 360).

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HALF_ANGLE_DEG;

/// How the configured wind direction is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindConvention {
    /// Bearing the wind blows from (meteorological). Downwind is opposite.
    #[default]
    From,
    /// Bearing the wind blows toward.
    Toward,
}

impl WindConvention {
    /// Bearing the plume travels along, in [0, 360).
    pub fn downwind_center_deg(self, wind_direction_deg: f64) -> f64 {
        match self {
            WindConvention::From => (wind_direction_deg + 180.0).rem_euclid(360.0),
            WindConvention::Toward => wind_direction_deg.rem_euclid(360.0),
        }
    }
}

/// Bearing of the vector `from → to`, in [0, 360).
pub fn bearing_deg(from: DVec2, to: DVec2) -> f64 {
    let delta = to - from;
    delta.y.atan2(delta.x).to_degrees().rem_euclid(360.0)
}

/// Smallest angle between two bearings, in [0, 180].
pub fn angular_difference_deg(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(360.0 - diff)
}

/// True when `target` lies within `half_angle_deg` of the sector centred on
/// `center_deg` as seen from `source`. The boundary is inclusive and a
/// target coinciding with the source is always inside.
pub fn within_sector(source: DVec2, target: DVec2, center_deg: f64, half_angle_deg: f64) -> bool {
    if source == target {
        return true;
    }
    angular_difference_deg(bearing_deg(source, target), center_deg) <= half_angle_deg
}

/// Sector test with the wind direction read as the bearing it blows from.
pub fn is_downwind(
    source: DVec2,
    target: DVec2,
    wind_direction_deg: f64,
    half_angle_deg: f64,
) -> bool {
    let center = WindConvention::From.downwind_center_deg(wind_direction_deg);
    within_sector(source, target, center, half_angle_deg)
}

/// Downwind sector with its centre resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownwindFilter {
    center_deg: f64,
    half_angle_deg: f64,
}

impl Default for DownwindFilter {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_HALF_ANGLE_DEG, WindConvention::From)
    }
}

impl DownwindFilter {
    pub fn new(wind_direction_deg: f64, half_angle_deg: f64, convention: WindConvention) -> Self {
        Self {
            center_deg: convention.downwind_center_deg(wind_direction_deg),
            half_angle_deg,
        }
    }

    pub fn center_deg(&self) -> f64 {
        self.center_deg
    }

    pub fn half_angle_deg(&self) -> f64 {
        self.half_angle_deg
    }

    #[inline]
    pub fn admits(&self, source: DVec2, target: DVec2) -> bool {
        within_sector(source, target, self.center_deg, self.half_angle_deg)
    }
}
