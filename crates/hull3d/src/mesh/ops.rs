//! Mesh construction, removal and neighbor bookkeeping.

use slotmap::SlotMap;

use super::types::{Face, FaceKey, Neighbor};
use crate::error::{HullError, Result};
use crate::geom::{newell_normal, HullFace, Point3, PointId};

/// Growable triangle mesh over a fixed point array.
///
/// Iteration follows face creation order; slot reuse does not reorder survivors.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    points: Vec<Point3>,
    faces: SlotMap<FaceKey, Face>,
    incident: Vec<Vec<FaceKey>>,
    /// Creation order, with stale keys swept once they outnumber live ones.
    order: Vec<FaceKey>,
}

impl Mesh {
    pub fn new(points: Vec<Point3>) -> Self {
        let incident = vec![Vec::new(); points.len()];
        Self {
            points,
            faces: SlotMap::with_key(),
            incident,
            order: Vec::new(),
        }
    }

    #[inline]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[inline]
    pub fn point(&self, p: PointId) -> &Point3 {
        &self.points[p.idx()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[inline]
    pub fn contains_face(&self, key: FaceKey) -> bool {
        self.faces.contains_key(key)
    }

    #[inline]
    pub fn face(&self, key: FaceKey) -> Option<&Face> {
        self.faces.get(key)
    }

    /// Like [`Mesh::face`] but a stale handle is reported as a consistency error.
    pub fn get(&self, key: FaceKey) -> Result<&Face> {
        self.faces
            .get(key)
            .ok_or_else(|| HullError::consistency(format!("stale face handle {key:?}")))
    }

    /// Live faces in creation order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &Face)> + '_ {
        self.order
            .iter()
            .filter_map(|&k| self.faces.get(k).map(|f| (k, f)))
    }

    pub fn keys(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|&k| self.faces.contains_key(k))
    }

    /// Faces currently containing `p`.
    #[inline]
    pub fn incident(&self, p: PointId) -> &[FaceKey] {
        &self.incident[p.idx()]
    }

    /// Signed distance from point `p` to face `key`'s plane.
    pub fn distance(&self, key: FaceKey, p: PointId) -> Result<f64> {
        Ok(self.get(key)?.distance(self.point(p)))
    }

    /// Insert the face `(a, b, c)` and link it to every face sharing one of its edges.
    pub fn add_face(&mut self, a: PointId, b: PointId, c: PointId) -> Result<FaceKey> {
        let n = self.points.len();
        if [a, b, c].iter().any(|p| p.idx() >= n) {
            return Err(HullError::consistency(format!(
                "face ({}, {}, {}) references a point outside 0..{n}",
                a.0, b.0, c.0
            )));
        }
        if a == b || b == c || a == c {
            return Err(HullError::consistency(format!(
                "face ({}, {}, {}) repeats a vertex",
                a.0, b.0, c.0
            )));
        }
        let hf = HullFace::from_points(&self.points, [a, b, c]);
        let key = self.faces.insert(Face {
            vertices: hf.vertices,
            normal: hf.normal,
            centroid: hf.centroid,
            neighbors: Vec::with_capacity(3),
        });
        self.order.push(key);
        self.find_neighbours(a, b, key)?;
        self.find_neighbours(b, c, key)?;
        self.find_neighbours(c, a, key)?;
        for p in [a, b, c] {
            self.incident[p.idx()].push(key);
        }
        Ok(key)
    }

    /// Link `new_face` symmetrically with every other face containing both `v1` and `v2`.
    pub fn find_neighbours(&mut self, v1: PointId, v2: PointId, new_face: FaceKey) -> Result<()> {
        let shared: Vec<FaceKey> = self.incident[v1.idx()]
            .iter()
            .copied()
            .filter(|k| *k != new_face && self.incident[v2.idx()].contains(k))
            .collect();
        for other in shared {
            let nf = self.get(new_face)?;
            if nf.neighbors.iter().any(|nb| nb.face == other) {
                continue;
            }
            let own_edge = directed(nf, v1, v2);
            let g = self.get(other)?;
            if nf.vertices.iter().all(|v| g.contains(*v)) {
                return Err(HullError::consistency(format!(
                    "duplicate face over ({}, {}, {})",
                    nf.vertices[0].0, nf.vertices[1].0, nf.vertices[2].0
                )));
            }
            let other_edge = directed(g, v1, v2);
            self.link(new_face, other, own_edge)?;
            self.link(other, new_face, other_edge)?;
        }
        Ok(())
    }

    fn link(&mut self, from: FaceKey, to: FaceKey, edge: (PointId, PointId)) -> Result<()> {
        let face = self
            .faces
            .get_mut(from)
            .ok_or_else(|| HullError::consistency(format!("stale face handle {from:?}")))?;
        if face.neighbors.len() >= 3 {
            return Err(HullError::consistency(format!(
                "face {from:?} would get a fourth neighbor across ({}, {})",
                edge.0 .0, edge.1 .0
            )));
        }
        face.neighbors.push(Neighbor {
            face: to,
            origin: edge.0,
            end: edge.1,
        });
        Ok(())
    }

    /// Remove a face, unlinking it from its neighbors and its vertices' incident lists.
    ///
    /// Other handles stay valid.
    pub fn remove_face(&mut self, key: FaceKey) -> Result<Face> {
        let face = self
            .faces
            .remove(key)
            .ok_or_else(|| HullError::consistency(format!("removing stale face {key:?}")))?;
        for nb in &face.neighbors {
            if let Some(g) = self.faces.get_mut(nb.face) {
                g.neighbors.retain(|x| x.face != key);
            }
        }
        for p in face.vertices {
            self.incident[p.idx()].retain(|k| *k != key);
        }
        if self.order.len() > 2 * self.faces.len() + 8 {
            let faces = &self.faces;
            self.order.retain(|&k| faces.contains_key(k));
        }
        Ok(face)
    }

    /// Reverse a face's winding and normal. Neighbor records of adjacent faces are
    /// stored in their own winding and stay untouched.
    pub fn flip_face(&mut self, key: FaceKey) -> Result<()> {
        let points = &self.points;
        let face = self
            .faces
            .get_mut(key)
            .ok_or_else(|| HullError::consistency(format!("flipping stale face {key:?}")))?;
        face.vertices.swap(1, 2);
        face.normal = newell_normal(&face.vertices.map(|v| points[v.idx()]));
        for nb in &mut face.neighbors {
            std::mem::swap(&mut nb.origin, &mut nb.end);
        }
        Ok(())
    }

    /// Every face has exactly 3 neighbors.
    pub fn is_closed(&self) -> bool {
        !self.faces.is_empty() && self.faces.values().all(|f| f.neighbors.len() == 3)
    }

    /// Every shared edge is traversed in opposite directions by its two faces.
    pub fn is_consistently_oriented(&self) -> bool {
        self.faces.values().all(|f| {
            f.neighbors.iter().all(|nb| {
                self.faces
                    .get(nb.face)
                    .is_some_and(|g| g.has_edge(nb.end, nb.origin))
            })
        })
    }

    /// Full structural check: symmetric links over real shared edges and exact
    /// incident lists.
    pub fn check_consistency(&self) -> Result<()> {
        for (key, f) in &self.faces {
            if f.neighbors.len() > 3 {
                return Err(HullError::consistency(format!(
                    "face {key:?} has {} neighbors",
                    f.neighbors.len()
                )));
            }
            for nb in &f.neighbors {
                if !f.has_edge(nb.origin, nb.end) {
                    return Err(HullError::consistency(format!(
                        "face {key:?} records edge ({}, {}) it does not have",
                        nb.origin.0, nb.end.0
                    )));
                }
                let g = self.get(nb.face)?;
                let back = g.neighbors.iter().find(|x| x.face == key).ok_or_else(|| {
                    HullError::consistency(format!("link {key:?} -> {:?} is one-sided", nb.face))
                })?;
                let same_edge = (back.origin, back.end) == (nb.origin, nb.end)
                    || (back.origin, back.end) == (nb.end, nb.origin);
                if !same_edge {
                    return Err(HullError::consistency(format!(
                        "faces {key:?} and {:?} disagree on their shared edge",
                        nb.face
                    )));
                }
            }
            for v in f.vertices {
                if !self.incident[v.idx()].contains(&key) {
                    return Err(HullError::consistency(format!(
                        "point {} misses incident face {key:?}",
                        v.0
                    )));
                }
            }
        }
        let total: usize = self.incident.iter().map(Vec::len).sum();
        if total != 3 * self.faces.len() {
            return Err(HullError::consistency(format!(
                "incident lists hold {total} entries for {} faces",
                self.faces.len()
            )));
        }
        Ok(())
    }

    /// Output faces in slot order.
    pub fn snapshot(&self) -> Vec<HullFace> {
        self.faces().map(|(_, f)| f.to_hull_face()).collect()
    }
}

/// `(v1, v2)` oriented the way `face` traverses it.
fn directed(face: &Face, v1: PointId, v2: PointId) -> (PointId, PointId) {
    if face.has_edge(v1, v2) {
        (v1, v2)
    } else {
        (v2, v1)
    }
}
