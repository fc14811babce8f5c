//! Initial tetrahedron shared by the outside-set and randomized engines, and the
//! degeneracy gate used by every engine.

use tracing::debug;

use crate::error::{HullError, Result};
use crate::geom::{centroid, newell_normal, segment_distance_sq, signed_distance, Point3, PointId};
use crate::mesh::{FaceKey, Mesh};

/// Pick four affinely independent points `[a, b, c, d]`, with `d` on the negative
/// side of the triangle `(a, b, c)`.
///
/// Fails with `DegenerateInput` when fewer than 4 points are given or when the
/// points are coincident, collinear or coplanar within `eps`.
pub(crate) fn find_simplex(points: &[Point3], eps: f64) -> Result<[PointId; 4]> {
    if points.len() < 4 {
        return Err(HullError::degenerate(format!(
            "need at least 4 points, got {}",
            points.len()
        )));
    }
    let ext = extremes(points);

    let mut best = f64::NEG_INFINITY;
    let (mut a, mut b) = (ext[0], ext[1]);
    for i in 0..ext.len() {
        for j in i + 1..ext.len() {
            let d = (points[ext[i]] - points[ext[j]]).norm();
            if d > best {
                best = d;
                (a, b) = (ext[i], ext[j]);
            }
        }
    }
    if best <= eps {
        return Err(HullError::degenerate("all points coincide"));
    }

    let (pa, pb) = (points[a], points[b]);
    let (c, seg) = argmax(points.len(), |i| segment_distance_sq(&pa, &pb, &points[i]));
    if seg.sqrt() <= eps {
        return Err(HullError::degenerate("all points are collinear"));
    }

    let tri = [pa, pb, points[c]];
    let n = newell_normal(&tri);
    let o = centroid(&tri);
    let (d, _) = argmax(points.len(), |i| signed_distance(&n, &o, &points[i]).abs());
    let sd = signed_distance(&n, &o, &points[d]);
    if sd.abs() <= eps {
        return Err(HullError::degenerate("all points are coplanar"));
    }
    let (a, b) = if sd > 0.0 { (b, a) } else { (a, b) };
    debug!(a, b, c, d, "simplex");
    Ok([PointId(a), PointId(b), PointId(c), PointId(d)])
}

/// Emit the four outward faces of a simplex from [`find_simplex`].
pub(crate) fn emit_simplex(mesh: &mut Mesh, s: [PointId; 4]) -> Result<[FaceKey; 4]> {
    let [a, b, c, d] = s;
    Ok([
        mesh.add_face(a, b, c)?,
        mesh.add_face(b, a, d)?,
        mesh.add_face(c, b, d)?,
        mesh.add_face(a, c, d)?,
    ])
}

/// Indices of min/max points along x, y, z (first index wins ties).
fn extremes(points: &[Point3]) -> [usize; 6] {
    let mut ext = [0usize; 6];
    for axis in 0..3 {
        let (mut lo, mut hi) = (0, 0);
        for (i, p) in points.iter().enumerate() {
            if p[axis] < points[lo][axis] {
                lo = i;
            }
            if p[axis] > points[hi][axis] {
                hi = i;
            }
        }
        ext[2 * axis] = lo;
        ext[2 * axis + 1] = hi;
    }
    ext
}

fn argmax(n: usize, f: impl Fn(usize) -> f64) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for i in 0..n {
        let v = f(i);
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}
