//! Hull validators shared by tests and the engines' validation mode.
//!
//! All checks work on plain output faces, so any engine can be compared with any
//! other.

use std::collections::{BTreeSet, HashSet};

use crate::error::{HullError, Result};
use crate::geom::{HullFace, Point3, PointId};

/// Faces as sorted vertex triples; equal sets mean combinatorially equal hulls.
pub fn canonical_faces(faces: &[HullFace]) -> BTreeSet<[usize; 3]> {
    faces.iter().map(HullFace::sorted_ids).collect()
}

/// Undirected edges as `(min, max)` id pairs.
pub fn edge_set(faces: &[HullFace]) -> BTreeSet<(usize, usize)> {
    let mut edges = BTreeSet::new();
    for f in faces {
        let [a, b, c] = f.vertices.map(PointId::idx);
        for (u, v) in [(a, b), (b, c), (c, a)] {
            edges.insert((u.min(v), u.max(v)));
        }
    }
    edges
}

/// Distinct hull vertex ids.
pub fn vertex_set(faces: &[HullFace]) -> BTreeSet<usize> {
    faces
        .iter()
        .flat_map(|f| f.vertices.map(PointId::idx))
        .collect()
}

/// `V - E + F`; equals 2 for a closed triangulated sphere.
pub fn euler_characteristic(faces: &[HullFace]) -> i64 {
    vertex_set(faces).len() as i64 - edge_set(faces).len() as i64 + faces.len() as i64
}

/// Mean of the hull vertices; strictly interior for a non-degenerate hull.
pub fn interior_point(points: &[Point3], faces: &[HullFace]) -> Option<Point3> {
    let verts = vertex_set(faces);
    if verts.is_empty() {
        return None;
    }
    let sum = verts
        .iter()
        .fold(Point3::zeros(), |acc, &i| acc + points[i]);
    Some(sum / verts.len() as f64)
}

/// Every face normal points away from the hull's interior point.
pub fn normals_outward(points: &[Point3], faces: &[HullFace]) -> bool {
    let Some(c) = interior_point(points, faces) else {
        return false;
    };
    faces.iter().all(|f| f.distance(&c) < 0.0)
}

/// First point that is not a hull vertex and lies beyond `eps` outside some face.
pub fn first_escaping_point(points: &[Point3], faces: &[HullFace], eps: f64) -> Option<PointId> {
    let verts: HashSet<usize> = vertex_set(faces).into_iter().collect();
    (0..points.len())
        .filter(|i| !verts.contains(i))
        .find(|&i| faces.iter().any(|f| f.distance(&points[i]) > eps))
        .map(PointId)
}

/// No input point lies strictly outside the hull.
pub fn contains_all(points: &[Point3], faces: &[HullFace], eps: f64) -> bool {
    first_escaping_point(points, faces, eps).is_none()
}

/// Every undirected edge is shared by exactly two faces traversing it in
/// opposite directions.
pub fn is_closed_oriented(faces: &[HullFace]) -> bool {
    let mut directed: HashSet<(usize, usize)> = HashSet::new();
    for f in faces {
        let [a, b, c] = f.vertices.map(PointId::idx);
        for e in [(a, b), (b, c), (c, a)] {
            if !directed.insert(e) {
                return false;
            }
        }
    }
    directed.iter().all(|&(u, v)| directed.contains(&(v, u)))
}

/// Combined structural and geometric check of a finished hull.
pub fn validate_hull(points: &[Point3], faces: &[HullFace], eps: f64) -> Result<()> {
    if faces.len() < 4 {
        return Err(HullError::consistency(format!(
            "hull has only {} faces",
            faces.len()
        )));
    }
    if !is_closed_oriented(faces) {
        return Err(HullError::consistency("hull is not a closed oriented surface"));
    }
    let chi = euler_characteristic(faces);
    if chi != 2 {
        return Err(HullError::consistency(format!(
            "Euler characteristic {chi} != 2"
        )));
    }
    if !normals_outward(points, faces) {
        return Err(HullError::consistency("a face normal points inward"));
    }
    if let Some(p) = first_escaping_point(points, faces, eps) {
        return Err(HullError::consistency(format!(
            "point {} lies outside the hull",
            p.0
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn tetra() -> (Vec<Point3>, Vec<HullFace>) {
        let pts = vec![
            vector![0.0, 0.0, 0.0],
            vector![1.0, 0.0, 0.0],
            vector![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            vector![0.1, 0.1, 0.1],
        ];
        let faces = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]]
            .iter()
            .map(|t| HullFace::from_points(&pts, t.map(PointId)))
            .collect();
        (pts, faces)
    }

    #[test]
    fn tetrahedron_passes_all_checks() {
        let (pts, faces) = tetra();
        assert_eq!(euler_characteristic(&faces), 2);
        assert_eq!(edge_set(&faces).len(), 6);
        assert!(is_closed_oriented(&faces));
        assert!(normals_outward(&pts, &faces));
        assert!(contains_all(&pts, &faces, 1e-12));
        validate_hull(&pts, &faces, 1e-12).unwrap();
    }

    #[test]
    fn detects_flipped_face_and_escaping_point() {
        let (mut pts, mut faces) = tetra();
        faces[2] = HullFace::from_points(&pts, [1, 3, 2].map(PointId));
        assert!(!is_closed_oriented(&faces));
        assert!(!normals_outward(&pts, &faces));
        assert!(validate_hull(&pts, &faces, 1e-12).is_err());

        let (_, good) = tetra();
        pts[4] = vector![1.0, 1.0, 1.0];
        assert_eq!(first_escaping_point(&pts, &good, 1e-12), Some(PointId(4)));
    }

    #[test]
    fn canonical_faces_ignore_winding() {
        let (pts, faces) = tetra();
        let flipped: Vec<HullFace> = faces
            .iter()
            .map(|f| {
                let [a, b, c] = f.vertices;
                HullFace::from_points(&pts, [a, c, b])
            })
            .collect();
        assert_eq!(canonical_faces(&faces), canonical_faces(&flipped));
    }
}
