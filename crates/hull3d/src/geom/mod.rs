//! Geometry primitives for 3D hull construction.
//!
//! Purpose
//! - Orientation and kinetic-time predicates for the divide-and-conquer merge.
//! - Newell normals and the extent-scaled plane tolerance shared by every engine.
//!
//! Why this design
//! - Points are plain `nalgebra` vectors addressed by a stable `PointId`; faces only
//!   ever store ids, so no engine copies coordinates around.
//! - The tolerance is relative to the input's extent. A fixed epsilon misclassifies
//!   either tiny or huge inputs.
//!
//! Conventions
//! - A face `(a, b, c)` is wound counterclockwise seen from outside; its Newell
//!   normal points away from the hull interior.
//! - A point within `eps` of a plane counts as inside.

pub mod cfg;
mod predicates;
mod types;

pub use cfg::HullCfg;
pub use predicates::{
    centroid, kinetic_time, newell_normal, orientation, segment_distance_sq, signed_distance,
};
pub use types::{HullFace, Point3, PointId};

#[cfg(test)]
mod tests;
