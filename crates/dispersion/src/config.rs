/// Default number of point segments each lane is split into.
pub const DEFAULT_SEGMENTS_PER_LANE: u32 = 10;

/// Default half-width of the downwind sector, in degrees.
pub const DEFAULT_HALF_ANGLE_DEG: f64 = 45.0;

/// Default plume width growth per metre of downwind distance.
pub const DEFAULT_LATERAL_SPREAD_FACTOR: f64 = 0.1;

/// Source/target distances are clamped to at least this many metres.
pub const DEFAULT_MIN_DISTANCE_M: f64 = 0.1;

/// Default wind speed at mixing-layer height, in m/s.
pub const DEFAULT_WIND_SPEED_M_S: f64 = 1.0;

/// Default depth of the mixing layer, in metres.
pub const DEFAULT_MIXING_HEIGHT_M: f64 = 50.0;

/// Aggregation buckets are one hour wide unless configured otherwise.
pub const DEFAULT_BUCKET_SECONDS: u32 = 3600;

/// Default grid spacing in metres for field output.
pub const DEFAULT_GRID_RESOLUTION_M: f64 = 1.0;

/// Most evaluation points a grid may expand to (a 2000 x 2000 lattice).
pub const MAX_GRID_CELLS: u64 = 4_000_000;

/// Latest interval time accepted from a feed, in seconds (2^53). Exact in
/// f64, and any bucket ending after it still fits in a `u64`.
pub const MAX_INTERVAL_TIME_S: f64 = 9_007_199_254_740_992.0;

/// g/(km·h) → kg/(m·s): 1e-3 kg/g, 1e-3 km/m, 1/3600 h/s.
pub const G_PER_KM_H_TO_KG_PER_M_S: f64 = 1e-6 / 3600.0;

/// Empirical scale of the screening box model (`C = 10·Q / (u·H·k·d)`).
pub const SCREENING_SCALE: f64 = 10.0;

/// Reporting conversion, applied once when rows are finalized.
pub const KG_PER_M3_TO_UG_PER_M3: f64 = 1e9;

/// Relative tolerance for the unit-length check on lane directions.
pub const UNIT_VECTOR_TOLERANCE: f64 = 1e-9;
