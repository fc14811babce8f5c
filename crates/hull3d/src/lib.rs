//! 3D convex hull construction.
//!
//! Engines
//! - `quickhull`: outside-set expansion with single-cycle stepping.
//! - `dac`: divide-and-conquer kinetic merge.
//! - `incremental`: randomized insertion with a conflict graph.
//! - `naive`: O(n⁴) oracle for tests.
//!
//! Every engine implements [`HullEngine`] and returns outward-wound [`HullFace`]s
//! whose vertex ids index the input slice.

pub mod api;
pub mod check;
pub mod dac;
pub mod engine;
pub mod error;
pub mod geom;
pub mod incremental;
pub mod mesh;
pub mod naive;
pub mod quickhull;
pub mod sample;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use engine::{convex_hull, Algorithm, HullEngine};
pub use error::{HullError, Result};
pub use geom::{HullCfg, HullFace, Point3, PointId};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::engine::{convex_hull, Algorithm, HullEngine};
    pub use crate::error::{HullError, Result};
    pub use crate::geom::{HullCfg, HullFace, Point3, PointId};
    pub use crate::sample::{draw_points, Distribution, ReplayToken, SampleParams};
    pub use nalgebra::Vector3;
}

#[cfg(test)]
mod tests_agreement;
