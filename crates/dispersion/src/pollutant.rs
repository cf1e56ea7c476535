use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pollutants reported per lane by the emission feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pollutant {
    CO,
    CO2,
    NOx,
    PMx,
}

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [Pollutant::CO, Pollutant::CO2, Pollutant::NOx, Pollutant::PMx];

    pub fn name(self) -> &'static str {
        match self {
            Pollutant::CO => "CO",
            Pollutant::CO2 => "CO2",
            Pollutant::NOx => "NOx",
            Pollutant::PMx => "PMx",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pollutant {
    type Err = String;

    /// Accepts the feed's spelling case-insensitively, including the
    /// `<name>_normed` attribute form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = trimmed.strip_suffix("_normed").unwrap_or(trimmed);
        Pollutant::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(base))
            .ok_or_else(|| format!("unknown pollutant '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("CO".parse::<Pollutant>(), Ok(Pollutant::CO));
        assert_eq!("nox".parse::<Pollutant>(), Ok(Pollutant::NOx));
        assert_eq!("PMx_normed".parse::<Pollutant>(), Ok(Pollutant::PMx));
        assert!("SO2".parse::<Pollutant>().is_err());
    }

    #[test]
    fn test_display_matches_name() {
        for p in Pollutant::ALL {
            assert_eq!(p.to_string(), p.name());
        }
    }

    #[test]
    fn test_ordering_is_stable() {
        let mut v = vec![Pollutant::PMx, Pollutant::CO, Pollutant::NOx, Pollutant::CO2];
        v.sort();
        assert_eq!(v, Pollutant::ALL.to_vec());
    }
}
