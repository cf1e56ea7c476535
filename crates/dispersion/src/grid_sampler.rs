//! Regular lattice of evaluation points for concentration-field output.

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_GRID_RESOLUTION_M, MAX_GRID_CELLS};
use crate::error::ConfigError;
use crate::points::GridCell;

/// Snap tolerance so a bound that is a whole number of steps from the
/// minimum is included despite rounding.
const STEP_EPSILON: f64 = 1e-9;

/// Rectangular sampling region in metres, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}

fn default_resolution() -> f64 {
    DEFAULT_GRID_RESOLUTION_M
}

impl Default for GridSpec {
    /// ±30 m around the intersection centre at 1 m spacing.
    fn default() -> Self {
        Self {
            x_min: -30.0,
            x_max: 30.0,
            y_min: -30.0,
            y_max: 30.0,
            resolution: DEFAULT_GRID_RESOLUTION_M,
        }
    }
}

impl GridSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, v) in [
            ("grid.x_min", self.x_min),
            ("grid.x_max", self.x_max),
            ("grid.y_min", self.y_min),
            ("grid.y_max", self.y_max),
            ("grid.resolution", self.resolution),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if self.resolution <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "grid.resolution",
                value: self.resolution,
            });
        }
        if self.x_min > self.x_max {
            return Err(ConfigError::InvertedBounds {
                axis: 'x',
                min: self.x_min,
                max: self.x_max,
            });
        }
        if self.y_min > self.y_max {
            return Err(ConfigError::InvertedBounds {
                axis: 'y',
                min: self.y_min,
                max: self.y_max,
            });
        }
        let cells = self.cell_count();
        if !(cells <= MAX_GRID_CELLS as f64) {
            return Err(ConfigError::GridTooLarge {
                cells,
                limit: MAX_GRID_CELLS,
            });
        }
        Ok(())
    }

    /// Whole steps of `resolution` between `min` and `max`.
    fn span_steps(&self, min: f64, max: f64) -> f64 {
        ((max - min) / self.resolution + STEP_EPSILON).floor()
    }

    /// Lattice size computed in f64, so oversized grids can be rejected
    /// before any integer conversion.
    pub fn cell_count(&self) -> f64 {
        (self.span_steps(self.x_min, self.x_max) + 1.0)
            * (self.span_steps(self.y_min, self.y_max) + 1.0)
    }

    /// Number of lattice columns and rows, or `None` if either does not
    /// fit in a `u32`.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let steps = |min: f64, max: f64| {
            let span = self.span_steps(min, max);
            if !(0.0..=f64::from(u32::MAX)).contains(&span) {
                return None;
            }
            (span as u32).checked_add(1)
        };
        Some((steps(self.x_min, self.x_max)?, steps(self.y_min, self.y_max)?))
    }
}

/// Lattice from `(x_min, y_min)` to `(x_max, y_max)` inclusive at
/// `resolution` spacing. Cells are ordered column-major: all rows of the
/// first column, then the next column.
pub fn generate(bounds: &GridSpec) -> Result<Vec<GridCell>, ConfigError> {
    bounds.validate()?;
    let (columns, rows) = bounds.dimensions().ok_or(ConfigError::GridTooLarge {
        cells: bounds.cell_count(),
        limit: MAX_GRID_CELLS,
    })?;
    let mut cells = Vec::with_capacity((columns as usize).saturating_mul(rows as usize));
    for column in 0..columns {
        let x = bounds.x_min + column as f64 * bounds.resolution;
        for row in 0..rows {
            let y = bounds.y_min + row as f64 * bounds.resolution;
            cells.push(GridCell {
                column,
                row,
                position: DVec2::new(x, y),
            });
        }
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_is_61_by_61() {
        let cells = generate(&GridSpec::default()).unwrap();
        assert_eq!(cells.len(), 61 * 61);
        assert_eq!(cells[0].position, DVec2::new(-30.0, -30.0));
        assert_eq!(cells[1].position, DVec2::new(-30.0, -29.0));
        let last = cells.last().unwrap();
        assert_eq!(last.position, DVec2::new(30.0, 30.0));
        assert_eq!((last.column, last.row), (60, 60));
    }

    #[test]
    fn test_fractional_resolution_includes_upper_bound() {
        let spec = GridSpec {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 0.3,
            resolution: 0.1,
        };
        assert_eq!(spec.dimensions(), Some((11, 4)));
    }

    #[test]
    fn test_non_multiple_extent_stops_inside() {
        let spec = GridSpec {
            x_min: 0.0,
            x_max: 2.5,
            y_min: 0.0,
            y_max: 0.0,
            resolution: 1.0,
        };
        let cells = generate(&spec).unwrap();
        assert_eq!(cells.len(), 3);
        assert!(cells.iter().all(|c| c.position.x <= 2.5));
    }

    #[test]
    fn test_single_point_grid() {
        let spec = GridSpec {
            x_min: 5.0,
            x_max: 5.0,
            y_min: -2.0,
            y_max: -2.0,
            resolution: 1.0,
        };
        let cells = generate(&spec).unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].position, DVec2::new(5.0, -2.0));
    }

    #[test]
    fn test_rejects_bad_resolution() {
        let spec = GridSpec {
            resolution: 0.0,
            ..GridSpec::default()
        };
        assert!(matches!(
            generate(&spec),
            Err(ConfigError::NonPositive { field: "grid.resolution", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let spec = GridSpec {
            y_min: 10.0,
            y_max: -10.0,
            ..GridSpec::default()
        };
        assert!(matches!(
            generate(&spec),
            Err(ConfigError::InvertedBounds { axis: 'y', .. })
        ));
    }

    #[test]
    fn test_rejects_infinite_bounds() {
        let spec = GridSpec {
            x_max: f64::INFINITY,
            ..GridSpec::default()
        };
        assert!(matches!(generate(&spec), Err(ConfigError::NonFinite { .. })));
    }

    #[test]
    fn test_rejects_vanishing_resolution() {
        let spec = GridSpec {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 0.0,
            resolution: 1e-12,
        };
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::GridTooLarge { limit: MAX_GRID_CELLS, .. })
        ));
        assert!(matches!(generate(&spec), Err(ConfigError::GridTooLarge { .. })));
        assert_eq!(spec.dimensions(), None);
    }

    #[test]
    fn test_cell_limit_is_inclusive() {
        let at_limit = GridSpec {
            x_min: 0.0,
            x_max: 1999.0,
            y_min: 0.0,
            y_max: 1999.0,
            resolution: 1.0,
        };
        assert_eq!(at_limit.cell_count(), MAX_GRID_CELLS as f64);
        assert!(at_limit.validate().is_ok());
        assert_eq!(at_limit.dimensions(), Some((2000, 2000)));

        let over = GridSpec {
            x_max: 2000.0,
            ..at_limit
        };
        assert!(matches!(over.validate(), Err(ConfigError::GridTooLarge { .. })));
    }

    #[test]
    fn test_rejects_extent_overflowing_f64() {
        let spec = GridSpec {
            x_min: -f64::MAX,
            x_max: f64::MAX,
            ..GridSpec::default()
        };
        assert!(matches!(spec.validate(), Err(ConfigError::GridTooLarge { .. })));
    }
}
