//! Brute-force O(n⁴) hull, used as a correctness oracle.
//!
//! A triangle is a hull face iff no other point lies strictly (beyond `eps`) on one
//! side of its plane. On inputs in general position the result is the exact hull;
//! coplanar hull regions yield every supporting triangle, not a triangulation.

use tracing::debug;

use crate::engine::HullEngine;
use crate::error::Result;
use crate::geom::{HullCfg, HullFace, Point3, PointId};
use crate::quickhull::find_simplex;

#[derive(Debug, Default)]
pub struct Naive {
    cfg: HullCfg,
    points: Vec<Point3>,
    faces: Option<Vec<HullFace>>,
}

impl Naive {
    pub fn new(cfg: HullCfg) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }
}

impl HullEngine for Naive {
    fn initialize(&mut self, points: &[Point3]) {
        self.points = points.to_vec();
        self.faces = None;
    }

    fn full_hull(&mut self) -> Result<Vec<HullFace>> {
        if let Some(faces) = &self.faces {
            return Ok(faces.clone());
        }
        let eps = self.cfg.tolerance(&self.points)?;
        find_simplex(&self.points, eps)?;
        let faces = naive_hull(&self.points, eps);
        debug!(points = self.points.len(), faces = faces.len(), "naive done");
        self.faces = Some(faces.clone());
        Ok(faces)
    }

    fn step(&mut self) -> Result<Vec<HullFace>> {
        self.full_hull()
    }

    fn is_done(&self) -> bool {
        self.faces.is_some()
    }

    fn name(&self) -> &'static str {
        "naive"
    }
}

/// Every supporting triangle of `points`, wound outward.
pub fn naive_hull(points: &[Point3], eps: f64) -> Vec<HullFace> {
    let n = points.len();
    let mut faces = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let face = HullFace::from_points(points, [PointId(i), PointId(j), PointId(k)]);
                if face.normal == Point3::zeros() {
                    continue;
                }
                let (mut above, mut below) = (false, false);
                for (m, p) in points.iter().enumerate() {
                    if m == i || m == j || m == k {
                        continue;
                    }
                    let d = face.distance(p);
                    above |= d > eps;
                    below |= d < -eps;
                    if above && below {
                        break;
                    }
                }
                match (above, below) {
                    (false, true) => faces.push(face),
                    (true, false) => faces.push(HullFace::from_points(
                        points,
                        [PointId(i), PointId(k), PointId(j)],
                    )),
                    _ => {}
                }
            }
        }
    }
    faces
}
