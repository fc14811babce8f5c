//! Point and output-face types.

use nalgebra::Vector3;

use super::predicates::{centroid, newell_normal};

/// A 3D coordinate.
pub type Point3 = Vector3<f64>;

/// Stable identity of an input point (its index in the input slice).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

impl PointId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0
    }
}

/// Read-only output face: vertex ids in outward winding, unit normal, centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HullFace {
    pub vertices: [PointId; 3],
    pub normal: Vector3<f64>,
    pub centroid: Point3,
}

impl HullFace {
    /// Build a face over `points`; the normal follows the winding of `vertices`.
    pub fn from_points(points: &[Point3], vertices: [PointId; 3]) -> Self {
        let tri = vertices.map(|v| points[v.idx()]);
        Self {
            vertices,
            normal: newell_normal(&tri),
            centroid: centroid(&tri),
        }
    }

    /// Signed distance of `p` to the face plane (positive = outside).
    #[inline]
    pub fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&(p - self.centroid))
    }

    /// Vertex ids sorted ascending; equal for both windings of the same triangle.
    #[inline]
    pub fn sorted_ids(&self) -> [usize; 3] {
        let mut ids = self.vertices.map(PointId::idx);
        ids.sort_unstable();
        ids
    }
}
