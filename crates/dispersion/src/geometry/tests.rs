use std::collections::BTreeMap;

use bevy::math::DVec2;

use super::registry::LaneGeometryRegistry;
use super::types::{AnchorConvention, Approach, Flow, LaneSpec, LaneSpecConfig};
use crate::error::ConfigError;

#[test]
fn test_reference_intersection_has_eight_lanes() {
    let registry = LaneGeometryRegistry::reference_intersection();
    assert_eq!(registry.len(), 8);
    for lane in registry.iter() {
        assert!(
            (lane.direction().length() - 1.0).abs() < 1e-12,
            "lane {} direction not unit",
            lane.id()
        );
        assert!(lane.length() > 0.0);
    }
}

#[test]
fn test_lookup_by_id_and_alias() {
    let registry = LaneGeometryRegistry::reference_intersection();

    let north_in = registry.lookup("North In").unwrap();
    assert_eq!(north_in.direction(), DVec2::new(0.0, -1.0));
    assert!((north_in.length() - 74.5).abs() < f64::EPSILON);
    assert_eq!(north_in.approach(), Approach::North);
    assert_eq!(north_in.flow(), Flow::Inbound);

    // Two feed edges report for North In
    assert_eq!(registry.lookup("1232571604").unwrap().id(), "North In");
    assert_eq!(registry.lookup("237386421").unwrap().id(), "North In");
    assert_eq!(registry.lookup("-4922743#4").unwrap().id(), "West Out");
}

#[test]
fn test_lookup_unknown_lane() {
    let registry = LaneGeometryRegistry::reference_intersection();
    let err = registry.lookup("Diagonal In").unwrap_err();
    assert_eq!(err.lane_id, "Diagonal In");
}

#[test]
fn test_lane_direction_is_normalized() {
    let lane = LaneSpec::new("diag", DVec2::new(3.0, 4.0), 10.0, Approach::East, Flow::Inbound)
        .unwrap();
    assert!((lane.direction().length() - 1.0).abs() < 1e-12);
    assert!((lane.direction().x - 0.6).abs() < 1e-12);
    assert!((lane.direction().y - 0.8).abs() < 1e-12);
}

#[test]
fn test_lane_rejects_zero_direction() {
    let err = LaneSpec::new("bad", DVec2::ZERO, 10.0, Approach::East, Flow::Inbound).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroDirection { .. }));
}

#[test]
fn test_lane_rejects_negative_length() {
    let err =
        LaneSpec::new("bad", DVec2::X, -1.0, Approach::East, Flow::Inbound).unwrap_err();
    assert!(matches!(err, ConfigError::NegativeLength { .. }));
}

#[test]
fn test_zero_length_lane_is_allowed() {
    let lane = LaneSpec::new("stub", DVec2::X, 0.0, Approach::East, Flow::Outbound).unwrap();
    assert_eq!(lane.length(), 0.0);
}

#[test]
fn test_duplicate_lane_rejected() {
    let a = LaneSpec::new("A", DVec2::X, 1.0, Approach::East, Flow::Inbound).unwrap();
    let b = LaneSpec::new("A", DVec2::Y, 2.0, Approach::North, Flow::Inbound).unwrap();
    let err = LaneGeometryRegistry::new(vec![a, b], Vec::<(String, String)>::new()).unwrap_err();
    assert_eq!(err, ConfigError::DuplicateLane("A".to_string()));
}

#[test]
fn test_dangling_alias_rejected() {
    let a = LaneSpec::new("A", DVec2::X, 1.0, Approach::East, Flow::Inbound).unwrap();
    let err = LaneGeometryRegistry::new(vec![a], [("edge-9", "B")]).unwrap_err();
    assert!(matches!(err, ConfigError::DanglingAlias { .. }));
}

#[test]
fn test_from_config() {
    let lanes = vec![LaneSpecConfig {
        id: "North".to_string(),
        direction: [0.0, -1.0],
        length: 74.5,
        approach: Approach::North,
        flow: Flow::Unspecified,
    }];
    let mut aliases = BTreeMap::new();
    aliases.insert("1232571604".to_string(), "North".to_string());

    let registry = LaneGeometryRegistry::from_config(&lanes, &aliases).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup_index("1232571604"), Ok(0));
    assert_eq!(registry.get(0).unwrap().id(), "North");
}

#[test]
fn test_with_aliases_extends_reference() {
    let mut extra = BTreeMap::new();
    extra.insert("edge-x".to_string(), "South In".to_string());
    let registry = LaneGeometryRegistry::reference_intersection()
        .with_aliases(&extra)
        .unwrap();
    assert_eq!(registry.lookup("edge-x").unwrap().id(), "South In");
}

#[test]
fn test_midpoint_anchor_centres_lane() {
    let registry = LaneGeometryRegistry::reference_intersection();
    let lane = registry.lookup("North In").unwrap();
    let (start, end) = lane.endpoints(AnchorConvention::Midpoint);
    assert!((start.y - 37.25).abs() < 1e-12);
    assert!((end.y + 37.25).abs() < 1e-12);
    assert!(((start + end) * 0.5).length() < 1e-12);
}

#[test]
fn test_origin_anchor_starts_at_origin() {
    let registry = LaneGeometryRegistry::reference_intersection();
    let lane = registry.lookup("East Out").unwrap();
    let (start, end) = lane.endpoints(AnchorConvention::Origin);
    assert_eq!(start, DVec2::ZERO);
    assert!((end.x - 47.32).abs() < 1e-12);
}
