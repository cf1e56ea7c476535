// ---------------------------------------------------------------------------
// Error types for configuration, feed parsing and lane lookup
// ---------------------------------------------------------------------------

use std::fmt;

/// Invalid engine configuration. Always fatal: nothing is computed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `segments_per_lane` must be at least one.
    InvalidSegmentCount(u32),
    /// A strictly positive physical parameter was zero, negative or NaN.
    NonPositive { field: &'static str, value: f64 },
    /// A value that must be finite was NaN or infinite.
    NonFinite { field: &'static str },
    /// Half angle of the downwind sector outside [0, 180].
    HalfAngleOutOfRange(f64),
    /// Grid bounds with `min > max` on some axis.
    InvertedBounds { axis: char, min: f64, max: f64 },
    /// Receptor mode with no receptors.
    NoEvaluationPoints,
    /// Grid bounds and resolution expand to more than the cell limit.
    GridTooLarge { cells: f64, limit: u64 },
    /// Lane direction vector of zero length.
    ZeroDirection { lane: String },
    /// Lane length below zero.
    NegativeLength { lane: String, length: f64 },
    /// Two lanes declared with the same id.
    DuplicateLane(String),
    /// An alias pointing at a lane that does not exist.
    DanglingAlias { alias: String, lane: String },
    /// A grouping with an empty or repeated key field list.
    InvalidGrouping(String),
    /// The configuration document itself could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSegmentCount(n) => {
                write!(f, "segments_per_lane must be positive, got {n}")
            }
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            ConfigError::NonFinite { field } => write!(f, "{field} must be finite"),
            ConfigError::HalfAngleOutOfRange(deg) => {
                write!(f, "half_angle_deg must be within [0, 180], got {deg}")
            }
            ConfigError::InvertedBounds { axis, min, max } => {
                write!(f, "grid bounds inverted on {axis}: min {min} > max {max}")
            }
            ConfigError::NoEvaluationPoints => write!(f, "receptor list is empty"),
            ConfigError::GridTooLarge { cells, limit } => {
                write!(f, "grid expands to {cells:.0} cells, limit is {limit}")
            }
            ConfigError::ZeroDirection { lane } => {
                write!(f, "lane '{lane}' has a zero-length direction vector")
            }
            ConfigError::NegativeLength { lane, length } => {
                write!(f, "lane '{lane}' has negative length {length}")
            }
            ConfigError::DuplicateLane(id) => write!(f, "lane '{id}' is declared twice"),
            ConfigError::DanglingAlias { alias, lane } => {
                write!(f, "alias '{alias}' points at unknown lane '{lane}'")
            }
            ConfigError::InvalidGrouping(msg) => write!(f, "invalid grouping: {msg}"),
            ConfigError::Parse(msg) => write!(f, "configuration parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Malformed emission feed. Fatal: the run is aborted before any output.
#[derive(Debug, Clone, PartialEq)]
pub struct InputParseError {
    /// Zero-based record index, when the failure is tied to one record.
    pub record: Option<usize>,
    pub message: String,
}

impl InputParseError {
    pub fn at(record: usize, message: impl Into<String>) -> Self {
        Self {
            record: Some(record),
            message: message.into(),
        }
    }
}

impl fmt::Display for InputParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(idx) => write!(f, "emission feed record {idx}: {}", self.message),
            None => write!(f, "emission feed: {}", self.message),
        }
    }
}

impl std::error::Error for InputParseError {}

impl From<serde_json::Error> for InputParseError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            record: None,
            message: e.to_string(),
        }
    }
}

/// Lane id missing from the geometry registry. Recoverable: the record is
/// skipped and counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLaneError {
    pub lane_id: String,
}

impl fmt::Display for UnknownLaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lane '{}'", self.lane_id)
    }
}

impl std::error::Error for UnknownLaneError {}

/// Everything that can stop a screening run at the application boundary.
#[derive(Debug)]
pub enum ScreeningError {
    Config(ConfigError),
    InputParse(InputParseError),
    /// Reading the configuration or feed from disk failed.
    Io(std::io::Error),
}

impl fmt::Display for ScreeningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreeningError::Config(e) => write!(f, "{e}"),
            ScreeningError::InputParse(e) => write!(f, "{e}"),
            ScreeningError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ScreeningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScreeningError::Config(e) => Some(e),
            ScreeningError::InputParse(e) => Some(e),
            ScreeningError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ScreeningError {
    fn from(e: ConfigError) -> Self {
        ScreeningError::Config(e)
    }
}

impl From<InputParseError> for ScreeningError {
    fn from(e: InputParseError) -> Self {
        ScreeningError::InputParse(e)
    }
}

impl From<std::io::Error> for ScreeningError {
    fn from(e: std::io::Error) -> Self {
        ScreeningError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display_segments() {
        let msg = format!("{}", ConfigError::InvalidSegmentCount(0));
        assert!(msg.contains("segments_per_lane"), "got: {msg}");
        assert!(msg.contains('0'), "got: {msg}");
    }

    #[test]
    fn test_config_error_display_non_positive() {
        let err = ConfigError::NonPositive {
            field: "wind.speed",
            value: -1.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("wind.speed"), "got: {msg}");
        assert!(msg.contains("-1"), "got: {msg}");
    }

    #[test]
    fn test_config_error_display_grid_too_large() {
        let err = ConfigError::GridTooLarge {
            cells: 1e24,
            limit: 4_000_000,
        };
        let msg = format!("{err}");
        assert!(msg.contains("4000000"), "got: {msg}");
        assert!(msg.contains("cells"), "got: {msg}");
    }

    #[test]
    fn test_input_parse_error_names_record() {
        let err = InputParseError::at(7, "interval ends before it begins");
        let msg = format!("{err}");
        assert!(msg.contains("record 7"), "got: {msg}");
    }

    #[test]
    fn test_input_parse_error_from_json() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1, 2").unwrap_err();
        let err: InputParseError = json_err.into();
        assert!(err.record.is_none());
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_unknown_lane_display() {
        let err = UnknownLaneError {
            lane_id: "ghost".to_string(),
        };
        assert_eq!(format!("{err}"), "unknown lane 'ghost'");
    }

    #[test]
    fn test_screening_error_source_chain() {
        let err: ScreeningError = ConfigError::NoEvaluationPoints.into();
        assert!(std::error::Error::source(&err).is_some());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: ScreeningError = io.into();
        let msg = format!("{err}");
        assert!(msg.contains("I/O error"), "got: {msg}");
        assert!(msg.contains("missing.json"), "got: {msg}");
    }
}
