use std::collections::{BTreeMap, HashMap};

use crate::error::{ConfigError, UnknownLaneError};

use super::types::{Approach, Flow, LaneSpec, LaneSpecConfig};

/// Lengths (m) of the four arms of the surveyed intersection.
const NORTH_ARM_M: f64 = 74.5;
const SOUTH_ARM_M: f64 = 24.46;
const EAST_ARM_M: f64 = 47.32;
const WEST_ARM_M: f64 = 71.45;

/// Emission-feed edge ids and the lanes they report for.
const REFERENCE_EDGE_ALIASES: [(&str, &str); 9] = [
    ("-1232571604", "North Out"),
    ("1232571604", "North In"),
    ("237386421", "North In"),
    ("-29251749#0", "South In"),
    ("29251749#0", "South Out"),
    ("-617654357#1", "East In"),
    ("617654357#1", "East Out"),
    ("4922743#4", "West In"),
    ("-4922743#4", "West Out"),
];

/// Read-only lane table, built once per run and shared by every worker.
///
/// Lookups accept either a lane id or one of its aliases (the edge ids
/// used by the emission feed).
#[derive(Debug, Clone)]
pub struct LaneGeometryRegistry {
    lanes: Vec<LaneSpec>,
    by_id: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
}

impl Default for LaneGeometryRegistry {
    fn default() -> Self {
        Self::reference_intersection()
    }
}

impl LaneGeometryRegistry {
    /// Builds a registry from lanes plus `alias → lane id` pairs.
    pub fn new<I, A, L>(lanes: Vec<LaneSpec>, aliases: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (A, L)>,
        A: Into<String>,
        L: AsRef<str>,
    {
        let mut by_id = HashMap::with_capacity(lanes.len());
        for (idx, lane) in lanes.iter().enumerate() {
            if by_id.insert(lane.id().to_string(), idx).is_some() {
                return Err(ConfigError::DuplicateLane(lane.id().to_string()));
            }
        }

        let mut alias_map = HashMap::new();
        for (alias, target) in aliases {
            let alias = alias.into();
            let target = target.as_ref();
            match by_id.get(target) {
                Some(&idx) => {
                    alias_map.insert(alias, idx);
                }
                None => {
                    return Err(ConfigError::DanglingAlias {
                        alias,
                        lane: target.to_string(),
                    })
                }
            }
        }

        Ok(Self {
            lanes,
            by_id,
            aliases: alias_map,
        })
    }

    pub fn from_config(
        lanes: &[LaneSpecConfig],
        aliases: &BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let specs = lanes
            .iter()
            .map(LaneSpecConfig::to_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(specs, aliases.iter().map(|(a, l)| (a.clone(), l.as_str())))
    }

    /// The eight directional lanes of the surveyed four-arm intersection,
    /// with the feed's edge ids registered as aliases.
    pub fn reference_intersection() -> Self {
        let lanes = vec![
            LaneSpec::axis("North In", 0.0, -1.0, NORTH_ARM_M, Approach::North, Flow::Inbound),
            LaneSpec::axis("North Out", 0.0, 1.0, NORTH_ARM_M, Approach::North, Flow::Outbound),
            LaneSpec::axis("South In", 0.0, 1.0, SOUTH_ARM_M, Approach::South, Flow::Inbound),
            LaneSpec::axis("South Out", 0.0, -1.0, SOUTH_ARM_M, Approach::South, Flow::Outbound),
            LaneSpec::axis("East In", -1.0, 0.0, EAST_ARM_M, Approach::East, Flow::Inbound),
            LaneSpec::axis("East Out", 1.0, 0.0, EAST_ARM_M, Approach::East, Flow::Outbound),
            LaneSpec::axis("West In", 1.0, 0.0, WEST_ARM_M, Approach::West, Flow::Inbound),
            LaneSpec::axis("West Out", -1.0, 0.0, WEST_ARM_M, Approach::West, Flow::Outbound),
        ];
        let by_id: HashMap<String, usize> = lanes
            .iter()
            .enumerate()
            .map(|(idx, lane)| (lane.id().to_string(), idx))
            .collect();
        let aliases = REFERENCE_EDGE_ALIASES
            .iter()
            .filter_map(|(alias, lane)| by_id.get(*lane).map(|&idx| (alias.to_string(), idx)))
            .collect();
        Self {
            lanes,
            by_id,
            aliases,
        }
    }

    /// Adds aliases on top of an existing registry.
    pub fn with_aliases<'a, I>(mut self, aliases: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (alias, target) in aliases {
            let idx = *self
                .by_id
                .get(target)
                .ok_or_else(|| ConfigError::DanglingAlias {
                    alias: alias.clone(),
                    lane: target.clone(),
                })?;
            self.aliases.insert(alias.clone(), idx);
        }
        Ok(self)
    }

    /// Resolves a lane id or alias to its position in the table.
    pub fn lookup_index(&self, lane_id: &str) -> Result<usize, UnknownLaneError> {
        self.by_id
            .get(lane_id)
            .or_else(|| self.aliases.get(lane_id))
            .copied()
            .ok_or_else(|| UnknownLaneError {
                lane_id: lane_id.to_string(),
            })
    }

    /// Resolves a lane id or alias to its geometry.
    pub fn lookup(&self, lane_id: &str) -> Result<&LaneSpec, UnknownLaneError> {
        self.lookup_index(lane_id).map(|idx| &self.lanes[idx])
    }

    pub fn get(&self, index: usize) -> Option<&LaneSpec> {
        self.lanes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LaneSpec> {
        self.lanes.iter()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}
