//! Mesh data types.

use nalgebra::Vector3;
use slotmap::new_key_type;

use crate::geom::{HullFace, Point3, PointId};

new_key_type! {
    /// Stable face handle; invalidated only by removing that face.
    pub struct FaceKey;
}

/// Adjacent face across the edge `origin -> end` (in this face's winding).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    pub face: FaceKey,
    pub origin: PointId,
    pub end: PointId,
}

#[derive(Clone, Debug)]
pub struct Face {
    pub vertices: [PointId; 3],
    pub normal: Vector3<f64>,
    pub centroid: Point3,
    pub neighbors: Vec<Neighbor>,
}

impl Face {
    #[inline]
    pub fn contains(&self, p: PointId) -> bool {
        self.vertices.contains(&p)
    }

    /// The three directed edges in winding order.
    #[inline]
    pub fn edges(&self) -> [(PointId, PointId); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// Whether `origin -> end` is one of this face's directed edges.
    pub fn has_edge(&self, origin: PointId, end: PointId) -> bool {
        self.edges().contains(&(origin, end))
    }

    #[inline]
    pub fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&(p - self.centroid))
    }

    pub fn to_hull_face(&self) -> HullFace {
        HullFace {
            vertices: self.vertices,
            normal: self.normal,
            centroid: self.centroid,
        }
    }
}
