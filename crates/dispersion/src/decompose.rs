//! Line-source decomposition.
//!
//! A lane emits along its whole centreline. For distance-based modelling the
//! lane is cut into `N` equal sub-segments, each treated as a point source
//! at its centre carrying its share of the lane's emission.

use bevy::math::DVec2;

use crate::config::G_PER_KM_H_TO_KG_PER_M_S;
use crate::error::ConfigError;
use crate::geometry::{AnchorConvention, LaneSpec};

/// One point source produced by [`SegmentDecomposer::decompose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceSegment<'a> {
    pub lane: &'a LaneSpec,
    /// Zero-based index along the lane direction.
    pub index: u32,
    /// Centre of the sub-segment.
    pub position: DVec2,
    /// Sub-segment length in metres.
    pub length: f64,
    /// Emission rate in kg/s.
    pub emission_rate: f64,
}

/// Converts a feed rate in g/(km·h) to kg/(m·s).
pub fn rate_per_metre(normalized_rate_g_per_km_h: f64) -> f64 {
    normalized_rate_g_per_km_h * G_PER_KM_H_TO_KG_PER_M_S
}

/// Centre of segment `index` of `segments` along a lane starting at `start`.
pub fn segment_position(
    start: DVec2,
    direction: DVec2,
    length: f64,
    index: u32,
    segments: u32,
) -> DVec2 {
    let segment_length = length / segments as f64;
    start + direction * ((index as f64 + 0.5) * segment_length)
}

/// Splits lanes into equal point segments under a fixed anchor convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDecomposer {
    segments: u32,
    anchor: AnchorConvention,
}

impl SegmentDecomposer {
    pub fn new(segments: u32, anchor: AnchorConvention) -> Result<Self, ConfigError> {
        if segments == 0 {
            return Err(ConfigError::InvalidSegmentCount(segments));
        }
        Ok(Self { segments, anchor })
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn anchor(&self) -> AnchorConvention {
        self.anchor
    }

    /// Decomposes `lane` carrying `normalized_rate` g/(km·h) into ordered
    /// point sources. A zero-length lane or a zero rate yields segments
    /// with zero emission.
    pub fn decompose<'a>(&self, lane: &'a LaneSpec, normalized_rate: f64) -> Vec<SourceSegment<'a>> {
        let n = self.segments;
        let length = lane.length();
        let segment_length = length / n as f64;
        let emission_rate = rate_per_metre(normalized_rate) * segment_length;
        let start = self.anchor.start_point(lane.direction(), length);

        (0..n)
            .map(|index| SourceSegment {
                lane,
                index,
                position: segment_position(start, lane.direction(), length, index, n),
                length: segment_length,
                emission_rate,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Approach, Flow, LaneGeometryRegistry};

    fn north_lane() -> LaneSpec {
        LaneSpec::new("North", DVec2::new(0.0, -1.0), 74.5, Approach::North, Flow::Inbound)
            .unwrap()
    }

    #[test]
    fn test_zero_segments_is_config_error() {
        let err = SegmentDecomposer::new(0, AnchorConvention::Midpoint).unwrap_err();
        assert_eq!(err, ConfigError::InvalidSegmentCount(0));
    }

    #[test]
    fn test_first_segment_position_midpoint_anchor() {
        let lane = north_lane();
        let decomposer = SegmentDecomposer::new(10, AnchorConvention::Midpoint).unwrap();
        let segments = decomposer.decompose(&lane, 100.0);

        assert_eq!(segments.len(), 10);
        let first = segments[0];
        assert_eq!(first.index, 0);
        assert!(first.position.x.abs() < 1e-12);
        assert!(
            (first.position.y - 33.525).abs() < 1e-9,
            "got y={}",
            first.position.y
        );
    }

    #[test]
    fn test_first_segment_position_origin_anchor() {
        let lane = north_lane();
        let decomposer = SegmentDecomposer::new(10, AnchorConvention::Origin).unwrap();
        let segments = decomposer.decompose(&lane, 100.0);
        assert!((segments[0].position.y + 3.725).abs() < 1e-9);
        assert!((segments[9].position.y + 70.775).abs() < 1e-9);
    }

    #[test]
    fn test_segments_are_ordered_along_direction() {
        let lane = north_lane();
        let decomposer = SegmentDecomposer::new(7, AnchorConvention::Midpoint).unwrap();
        let segments = decomposer.decompose(&lane, 10.0);
        for pair in segments.windows(2) {
            assert_eq!(pair[1].index, pair[0].index + 1);
            let step = pair[1].position - pair[0].position;
            assert!(step.dot(lane.direction()) > 0.0);
        }
    }

    #[test]
    fn test_segment_lengths_partition_every_lane() {
        let registry = LaneGeometryRegistry::reference_intersection();
        for n in [1, 3, 10, 37] {
            let decomposer = SegmentDecomposer::new(n, AnchorConvention::Midpoint).unwrap();
            for lane in registry.iter() {
                let total: f64 = decomposer.decompose(lane, 1.0).iter().map(|s| s.length).sum();
                let rel = (total - lane.length()).abs() / lane.length();
                assert!(rel <= 1e-9, "lane {} n={n}: total {total}", lane.id());
            }
        }
    }

    #[test]
    fn test_segment_rates_sum_to_lane_rate() {
        let lane = north_lane();
        let decomposer = SegmentDecomposer::new(10, AnchorConvention::Midpoint).unwrap();
        let total: f64 = decomposer
            .decompose(&lane, 100.0)
            .iter()
            .map(|s| s.emission_rate)
            .sum();
        let expected = rate_per_metre(100.0) * 74.5;
        assert!((total - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn test_scenario_segment_rate() {
        let lane = north_lane();
        let decomposer = SegmentDecomposer::new(10, AnchorConvention::Midpoint).unwrap();
        let q = decomposer.decompose(&lane, 100.0)[0].emission_rate;
        assert!((rate_per_metre(100.0) - 2.7778e-8).abs() / 2.7778e-8 < 1e-4);
        assert!((q - 2.0694e-7).abs() / 2.0694e-7 < 1e-4, "got q={q}");
    }

    #[test]
    fn test_zero_length_lane_emits_nothing() {
        let lane = LaneSpec::new("stub", DVec2::X, 0.0, Approach::East, Flow::Inbound).unwrap();
        let decomposer = SegmentDecomposer::new(4, AnchorConvention::Midpoint).unwrap();
        let segments = decomposer.decompose(&lane, 500.0);
        assert_eq!(segments.len(), 4);
        assert!(segments.iter().all(|s| s.emission_rate == 0.0));
        assert!(segments.iter().all(|s| s.position == DVec2::ZERO));
    }
}
