//! Divide-and-conquer engine (kinetic merge).
//!
//! Purpose
//! - O(n log n) hull construction: the lower hull is the movie of a 2D hull under
//!   a continuous tilt, computed by recursive kinetic merging; the upper hull is the
//!   lower hull of the input with z negated.
//!
//! Why this design
//! - Boundary chains live in an index arena with explicit `Option` links; merge
//!   replay data is kept in separate event records (see `kinetic`).
//! - Movie triangles carry no reliable winding, so faces are wound afterwards by a
//!   breadth-first pass over the mesh adjacency, seeded with one face oriented
//!   against the input's interior point. Every face is reached exactly once, so a
//!   closed surface comes out consistently oriented.
//!
//! - Sweep ties and coplanar quadruples are removed by running the merge on a
//!   rotated and slightly jittered copy of the input (`kinetic::sweep_frame`). The
//!   jitter stays far below the tolerance, so the faces are valid for the original
//!   points.
//!
//! Preconditions
//! - No two points coincide; duplicates are reported as merge nontermination.
//! - No three hull points are collinear. Such an input can yield a zero-area face,
//!   which is reported as degenerate input.
//!
//! References
//! - T. M. Chan, "A minimalist's implementation of the 3-d divide-and-conquer
//!   convex hull algorithm" (2003).

mod kinetic;

use std::collections::VecDeque;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::check;
use crate::engine::HullEngine;
use crate::error::{HullError, Result};
use crate::geom::{HullCfg, HullFace, Point3};
use crate::mesh::{FaceKey, Mesh};
use crate::quickhull::find_simplex;

use kinetic::{sweep_frame, Chains};

/// Divide-and-conquer engine. Has no useful partial state, so the first `step`
/// completes the hull.
#[derive(Debug, Default)]
pub struct DivideConquer {
    cfg: HullCfg,
    points: Vec<Point3>,
    faces: Option<Vec<HullFace>>,
}

impl DivideConquer {
    pub fn new(cfg: HullCfg) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }
}

impl HullEngine for DivideConquer {
    fn initialize(&mut self, points: &[Point3]) {
        self.points = points.to_vec();
        self.faces = None;
    }

    fn full_hull(&mut self) -> Result<Vec<HullFace>> {
        if let Some(faces) = &self.faces {
            return Ok(faces.clone());
        }
        let faces = build(&self.points, &self.cfg)?;
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
        "dac"
    }
}

/// Lower and upper movies → mesh → consistent outward winding.
fn build(points: &[Point3], cfg: &HullCfg) -> Result<Vec<HullFace>> {
    let eps = cfg.tolerance(points)?;
    find_simplex(points, eps)?;

    let frame = sweep_frame(points, eps)?;
    let mut triangles = Vec::new();
    for (pass, z_sign) in [("lower", 1.0), ("upper", -1.0)] {
        let mut chains = Chains::new(&frame, z_sign);
        let movie = chains.lower_hull()?;
        debug!(pass, events = movie.len(), "dac movie");
        triangles.extend(
            movie
                .iter()
                .map(|e| [chains.id(e.prev), chains.id(e.node), chains.id(e.next)]),
        );
    }

    let mut mesh = Mesh::new(points.to_vec());
    for [a, b, c] in triangles {
        let key = mesh.add_face(a, b, c)?;
        if mesh.get(key)?.normal == Point3::zeros() {
            return Err(HullError::degenerate(format!(
                "hull points {}, {} and {} are collinear",
                a.0, b.0, c.0
            )));
        }
    }
    if !mesh.is_closed() {
        return Err(HullError::consistency(format!(
            "divide-and-conquer produced an open surface of {} faces",
            mesh.len()
        )));
    }
    let interior = points.iter().fold(Point3::zeros(), |acc, p| acc + p) / points.len() as f64;
    let flipped = orient(&mut mesh, &interior)?;
    debug!(faces = mesh.len(), flipped, "dac oriented");

    let faces = mesh.snapshot();
    if cfg.validate {
        mesh.check_consistency()?;
        check::validate_hull(points, &faces, eps)?;
    }
    Ok(faces)
}

/// Breadth-first winding propagation. Returns the number of flipped faces.
fn orient(mesh: &mut Mesh, interior: &Point3) -> Result<usize> {
    let Some(seed) = mesh.keys().next() else {
        return Ok(0);
    };
    let mut flipped = 0usize;
    if mesh.get(seed)?.distance(interior) > 0.0 {
        mesh.flip_face(seed)?;
        flipped += 1;
    }
    let mut seen: SecondaryMap<FaceKey, ()> = SecondaryMap::new();
    seen.insert(seed, ());
    let mut queue = VecDeque::from([seed]);
    while let Some(f) = queue.pop_front() {
        let neighbors = mesh.get(f)?.neighbors.clone();
        for nb in neighbors {
            if seen.contains_key(nb.face) {
                continue;
            }
            // An agreeing neighbor walks the shared edge backwards.
            if mesh.get(nb.face)?.has_edge(nb.origin, nb.end) {
                mesh.flip_face(nb.face)?;
                flipped += 1;
            }
            seen.insert(nb.face, ());
            queue.push_back(nb.face);
        }
    }
    if seen.len() != mesh.len() {
        return Err(HullError::consistency(format!(
            "winding reached {} of {} faces",
            seen.len(),
            mesh.len()
        )));
    }
    if !mesh.is_consistently_oriented() {
        return Err(HullError::consistency("winding is inconsistent after propagation"));
    }
    Ok(flipped)
}

/// Raw `(prev, node, next)` triangles of both movies, for inspection in tests.
#[cfg(test)]
fn movie_triangles(points: &[Point3], eps: f64) -> Result<Vec<[crate::geom::PointId; 3]>> {
    let frame = sweep_frame(points, eps)?;
    let mut out = Vec::new();
    for z_sign in [1.0, -1.0] {
        let mut chains = Chains::new(&frame, z_sign);
        for e in chains.lower_hull()? {
            out.push([chains.id(e.prev), chains.id(e.node), chains.id(e.next)]);
        }
    }
    Ok(out)
}
