//! Predicates used by the engines.
//!
//! `orientation` and `kinetic_time` take `Option` arguments: `None` stands for an
//! unlinked chain end. An orientation involving one is always convex and a kinetic
//! time involving one never happens.

use nalgebra::Vector3;

use super::types::Point3;

/// Twice the signed area of the xy projection of `p, q, r`.
///
/// Returns `1.0` when any argument is missing.
#[inline]
pub fn orientation(p: Option<&Point3>, q: Option<&Point3>, r: Option<&Point3>) -> f64 {
    match (p, q, r) {
        (Some(p), Some(q), Some(r)) => (q.x - p.x) * (r.y - p.y) - (r.x - p.x) * (q.y - p.y),
        _ => 1.0,
    }
}

/// Time at which `p, q, r` change turn direction while the xy plane is tilted
/// through z: the ratio of the xz and xy signed areas.
///
/// Returns `+inf` when any argument is missing or the xy area vanishes.
#[inline]
pub fn kinetic_time(p: Option<&Point3>, q: Option<&Point3>, r: Option<&Point3>) -> f64 {
    let (Some(p), Some(q), Some(r)) = (p, q, r) else {
        return f64::INFINITY;
    };
    let den = orientation(Some(p), Some(q), Some(r));
    if den == 0.0 {
        return f64::INFINITY;
    }
    ((q.x - p.x) * (r.z - p.z) - (r.x - p.x) * (q.z - p.z)) / den
}

/// Unit normal of a triangle by Newell's method.
///
/// Degenerate (zero-area or non-finite) triangles give the zero vector, never NaN.
pub fn newell_normal(tri: &[Point3; 3]) -> Vector3<f64> {
    // Relative to the first corner; the sums below lose precision far from the origin.
    let rel = [Vector3::zeros(), tri[1] - tri[0], tri[2] - tri[0]];
    let mut n = Vector3::<f64>::zeros();
    for i in 0..3 {
        let c = &rel[i];
        let d = &rel[(i + 1) % 3];
        n.x += (c.y - d.y) * (c.z + d.z);
        n.y += (c.z - d.z) * (c.x + d.x);
        n.z += (c.x - d.x) * (c.y + d.y);
    }
    let len = n.norm();
    if len > 0.0 && len.is_finite() {
        n / len
    } else {
        Vector3::zeros()
    }
}

#[inline]
pub fn centroid(tri: &[Point3; 3]) -> Point3 {
    (tri[0] + tri[1] + tri[2]) / 3.0
}

/// Signed distance from `p` to the plane through `origin` with unit `normal`.
#[inline]
pub fn signed_distance(normal: &Vector3<f64>, origin: &Point3, p: &Point3) -> f64 {
    normal.dot(&(p - origin))
}

/// Squared distance from `c` to the segment `[a, b]`.
pub fn segment_distance_sq(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    let ab = b - a;
    let ac = c - a;
    let e = ac.dot(&ab);
    if e <= 0.0 {
        return ac.norm_squared();
    }
    let f = ab.norm_squared();
    if e >= f {
        return (c - b).norm_squared();
    }
    ac.norm_squared() - e * e / f
}
