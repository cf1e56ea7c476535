//! Screening box model.
//!
//! `C = 10·Q / (u · H · k·d)`: the emitted mass rate `Q` (kg/s) is carried
//! by wind speed `u` (m/s) through a box of depth `H` (m) whose width grows
//! linearly with downwind distance `d` (m) at rate `k`. Output is kg/m³.

use crate::config::{
    DEFAULT_LATERAL_SPREAD_FACTOR, DEFAULT_MIN_DISTANCE_M, DEFAULT_MIXING_HEIGHT_M,
    DEFAULT_WIND_SPEED_M_S, KG_PER_M3_TO_UG_PER_M3, SCREENING_SCALE,
};
use crate::error::ConfigError;

/// Concentration contribution in kg/m³ with distance clamped to
/// [`DEFAULT_MIN_DISTANCE_M`].
pub fn concentration(
    q: f64,
    wind_speed: f64,
    mixing_height: f64,
    lateral_spread_factor: f64,
    distance: f64,
) -> f64 {
    let d = distance.max(DEFAULT_MIN_DISTANCE_M);
    SCREENING_SCALE * q / (wind_speed * mixing_height * (lateral_spread_factor * d))
}

/// kg/m³ → µg/m³.
#[inline]
pub fn to_ug_per_m3(kg_per_m3: f64) -> f64 {
    kg_per_m3 * KG_PER_M3_TO_UG_PER_M3
}

/// Validated model parameters, fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcentrationModel {
    wind_speed: f64,
    mixing_height: f64,
    lateral_spread_factor: f64,
    min_distance: f64,
}

impl Default for ConcentrationModel {
    fn default() -> Self {
        Self {
            wind_speed: DEFAULT_WIND_SPEED_M_S,
            mixing_height: DEFAULT_MIXING_HEIGHT_M,
            lateral_spread_factor: DEFAULT_LATERAL_SPREAD_FACTOR,
            min_distance: DEFAULT_MIN_DISTANCE_M,
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(value)
}

impl ConcentrationModel {
    pub fn new(
        wind_speed: f64,
        mixing_height: f64,
        lateral_spread_factor: f64,
        min_distance: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            wind_speed: require_positive("wind.speed", wind_speed)?,
            mixing_height: require_positive("wind.mixing_height", mixing_height)?,
            lateral_spread_factor: require_positive(
                "lateral_spread_factor",
                lateral_spread_factor,
            )?,
            min_distance: require_positive("min_distance", min_distance)?,
        })
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Distance actually used by the formula.
    #[inline]
    pub fn effective_distance(&self, distance: f64) -> f64 {
        distance.max(self.min_distance)
    }

    /// Contribution in kg/m³ of a point source emitting `q` kg/s at
    /// `distance` metres.
    #[inline]
    pub fn at_distance(&self, q: f64, distance: f64) -> f64 {
        let d = self.effective_distance(distance);
        SCREENING_SCALE * q / (self.wind_speed * self.mixing_height * (self.lateral_spread_factor * d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_value() {
        let q = 2.0694444444444446e-7;
        let c = concentration(q, 1.0, 50.0, 0.1, 33.525);
        assert!((c - 1.2347e-8).abs() / 1.2347e-8 < 0.01, "got {c}");
        let ug = to_ug_per_m3(c);
        assert!((ug - 12.347).abs() / 12.347 < 0.01, "got {ug}");
    }

    #[test]
    fn test_strictly_decreasing_with_distance() {
        let model = ConcentrationModel::default();
        let q = 1e-6;
        let mut prev = f64::INFINITY;
        for step in 1..200 {
            let d = step as f64 * 0.5;
            let c = model.at_distance(q, d);
            assert!(c < prev, "not decreasing at d={d}: {c} >= {prev}");
            prev = c;
        }
    }

    #[test]
    fn test_zero_rate_is_zero() {
        let model = ConcentrationModel::default();
        for d in [0.0, 0.05, 1.0, 1000.0] {
            let c = model.at_distance(0.0, d);
            assert_eq!(c, 0.0);
            assert!(c.is_finite());
        }
    }

    #[test]
    fn test_zero_distance_is_clamped() {
        let model = ConcentrationModel::default();
        let q = 2e-7;
        let at_zero = model.at_distance(q, 0.0);
        assert!(at_zero.is_finite());
        assert_eq!(at_zero, model.at_distance(q, 0.1));
        assert_eq!(at_zero, concentration(q, 1.0, 50.0, 0.1, 0.0));
        assert!(at_zero > model.at_distance(q, 1.0));
    }

    #[test]
    fn test_custom_min_distance() {
        let model = ConcentrationModel::new(1.0, 50.0, 0.1, 2.0).unwrap();
        assert_eq!(model.at_distance(1e-6, 0.5), model.at_distance(1e-6, 2.0));
        assert_eq!(model.effective_distance(3.0), 3.0);
    }

    #[test]
    fn test_rejects_non_positive_parameters() {
        assert!(matches!(
            ConcentrationModel::new(-1.0, 50.0, 0.1, 0.1),
            Err(ConfigError::NonPositive { field: "wind.speed", .. })
        ));
        assert!(matches!(
            ConcentrationModel::new(1.0, 0.0, 0.1, 0.1),
            Err(ConfigError::NonPositive { field: "wind.mixing_height", .. })
        ));
        assert!(matches!(
            ConcentrationModel::new(1.0, 50.0, f64::NAN, 0.1),
            Err(ConfigError::NonFinite { field: "lateral_spread_factor" })
        ));
    }

    #[test]
    fn test_inverse_in_wind_speed_and_height() {
        let slow = ConcentrationModel::new(1.0, 50.0, 0.1, 0.1).unwrap();
        let fast = ConcentrationModel::new(2.0, 50.0, 0.1, 0.1).unwrap();
        let deep = ConcentrationModel::new(1.0, 100.0, 0.1, 0.1).unwrap();
        let c = slow.at_distance(1e-6, 10.0);
        assert!((fast.at_distance(1e-6, 10.0) - c / 2.0).abs() < 1e-20);
        assert!((deep.at_distance(1e-6, 10.0) - c / 2.0).abs() < 1e-20);
    }
}
