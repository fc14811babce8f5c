//! Curated surface for drivers (UNSTABLE).
//!
//! Breaking changes are allowed; drivers should import from here.

// Engines
pub use crate::dac::DivideConquer;
pub use crate::engine::{convex_hull, Algorithm, HullEngine};
pub use crate::incremental::Randomized;
pub use crate::naive::{naive_hull, Naive};
pub use crate::quickhull::QuickHull;
// Geometry and mesh
pub use crate::geom::{HullCfg, HullFace, Point3, PointId};
pub use crate::mesh::{Face, FaceKey, Mesh, Neighbor};
// Validation
pub use crate::check::{
    canonical_faces, contains_all, euler_characteristic, normals_outward, validate_hull,
};
// Sampling
pub use crate::sample::{draw_points, Distribution, ReplayToken, SampleError, SampleParams};
