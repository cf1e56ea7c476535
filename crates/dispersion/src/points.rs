//! Evaluation points: fixed receptors or cells of a sampling grid.

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

/// Anything the pipeline can evaluate a concentration at.
pub trait Positioned {
    fn position(&self) -> DVec2;
}

/// A named point of interest, e.g. a kerbside monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceptorPoint {
    pub id: String,
    pub position: DVec2,
}

impl Positioned for ReceptorPoint {
    fn position(&self) -> DVec2 {
        self.position
    }
}

/// One node of a regular sampling lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub column: u32,
    pub row: u32,
    pub position: DVec2,
}

impl Positioned for GridCell {
    fn position(&self) -> DVec2 {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationPoint {
    Receptor(ReceptorPoint),
    Cell(GridCell),
}

impl EvaluationPoint {
    /// Label used in result rows: the receptor id, or `column:row`.
    pub fn label(&self) -> String {
        match self {
            EvaluationPoint::Receptor(r) => r.id.clone(),
            EvaluationPoint::Cell(c) => format!("{}:{}", c.column, c.row),
        }
    }
}

impl Positioned for EvaluationPoint {
    fn position(&self) -> DVec2 {
        match self {
            EvaluationPoint::Receptor(r) => r.position,
            EvaluationPoint::Cell(c) => c.position,
        }
    }
}

impl From<ReceptorPoint> for EvaluationPoint {
    fn from(r: ReceptorPoint) -> Self {
        EvaluationPoint::Receptor(r)
    }
}

impl From<GridCell> for EvaluationPoint {
    fn from(c: GridCell) -> Self {
        EvaluationPoint::Cell(c)
    }
}

/// Receptor entry as written in the configuration file. Receptors without
/// an id are named after their position in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceptorConfig {
    #[serde(default)]
    pub id: Option<String>,
    pub position: [f64; 2],
}

impl ReceptorConfig {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            id: None,
            position: [x, y],
        }
    }

    pub fn to_receptor(&self, index: usize) -> ReceptorPoint {
        ReceptorPoint {
            id: self.id.clone().unwrap_or_else(|| index.to_string()),
            position: DVec2::new(self.position[0], self.position[1]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_uniform_across_kinds() {
        let receptor: EvaluationPoint = ReceptorPoint {
            id: "kerb".to_string(),
            position: DVec2::new(1.0, 2.0),
        }
        .into();
        let cell: EvaluationPoint = GridCell {
            column: 3,
            row: 4,
            position: DVec2::new(1.0, 2.0),
        }
        .into();
        assert_eq!(receptor.position(), cell.position());
        assert_eq!(receptor.label(), "kerb");
        assert_eq!(cell.label(), "3:4");
    }

    #[test]
    fn test_receptor_config_default_id() {
        let cfg = ReceptorConfig::at(20.0, 0.0);
        let r = cfg.to_receptor(1);
        assert_eq!(r.id, "1");
        assert_eq!(r.position, DVec2::new(20.0, 0.0));
    }
}
