//! Static lane geometry of the modelled intersection.
//!
//! Each lane is a straight centreline described by a unit direction vector
//! and a length. Where the centreline sits relative to the intersection
//! origin is decided by an [`AnchorConvention`] chosen once per run.

mod registry;
#[cfg(test)]
mod tests;
mod types;

pub use registry::LaneGeometryRegistry;
pub use types::{AnchorConvention, Approach, Flow, LaneSpec, LaneSpecConfig};
