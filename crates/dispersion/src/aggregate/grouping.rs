use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::types::{Contribution, GroupKey};

/// One dimension a result can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyField {
    TimeBucket,
    Pollutant,
    Lane,
    Approach,
    Flow,
    Point,
}

impl KeyField {
    pub fn name(self) -> &'static str {
        match self {
            KeyField::TimeBucket => "time_bucket",
            KeyField::Pollutant => "pollutant",
            KeyField::Lane => "lane",
            KeyField::Approach => "approach",
            KeyField::Flow => "flow",
            KeyField::Point => "point",
        }
    }
}

/// A set of key fields. Every contribution is summed into one row per
/// distinct value of those fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    name: String,
    fields: Vec<KeyField>,
}

impl Grouping {
    /// Fields are kept in canonical order so equal sets share a name.
    pub fn new(fields: impl IntoIterator<Item = KeyField>) -> Result<Self, ConfigError> {
        let mut fields: Vec<KeyField> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(ConfigError::InvalidGrouping(
                "a grouping needs at least one key field".to_string(),
            ));
        }
        fields.sort();
        let before = fields.len();
        fields.dedup();
        if fields.len() != before {
            return Err(ConfigError::InvalidGrouping(
                "a grouping lists the same key field twice".to_string(),
            ));
        }
        let name = fields
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join("+");
        Ok(Self { name, fields })
    }

    /// Builds a list of groupings, rejecting duplicates.
    pub fn list(specs: &[Vec<KeyField>]) -> Result<Vec<Grouping>, ConfigError> {
        let mut out: Vec<Grouping> = Vec::with_capacity(specs.len());
        for spec in specs {
            let grouping = Grouping::new(spec.iter().copied())?;
            if out.iter().any(|g| g.name == grouping.name) {
                return Err(ConfigError::InvalidGrouping(format!(
                    "grouping '{}' is listed twice",
                    grouping.name
                )));
            }
            out.push(grouping);
        }
        Ok(out)
    }

    /// Per point, lane, approach, flow and bucket totals for every bucket
    /// and pollutant, plus a per-pollutant total over the whole run.
    pub fn default_fields() -> Vec<Vec<KeyField>> {
        use KeyField::*;
        vec![
            vec![TimeBucket, Pollutant, Point],
            vec![TimeBucket, Pollutant, Lane],
            vec![TimeBucket, Pollutant, Approach],
            vec![TimeBucket, Pollutant, Flow],
            vec![TimeBucket, Pollutant],
            vec![Pollutant],
        ]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }

    pub fn has(&self, field: KeyField) -> bool {
        self.fields.contains(&field)
    }

    /// Projects a contribution onto this grouping's key.
    pub fn key_for(&self, c: &Contribution) -> GroupKey {
        let mut key = GroupKey::default();
        for field in &self.fields {
            match field {
                KeyField::TimeBucket => key.bucket = Some(c.bucket),
                KeyField::Pollutant => key.pollutant = Some(c.pollutant),
                KeyField::Lane => key.lane = Some(c.lane),
                KeyField::Approach => key.approach = Some(c.approach),
                KeyField::Flow => key.flow = Some(c.flow),
                KeyField::Point => key.point = Some(c.point),
            }
        }
        key
    }
}
