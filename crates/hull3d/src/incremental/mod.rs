//! Randomized incremental engine with a conflict graph.
//!
//! Points are inserted in a seeded random order. Each face knows the pending points
//! that see it and each point knows the faces it sees, so an insertion touches only
//! the faces it actually replaces. Expected O(n log n).
//!
//! A new face over horizon edge `(origin, end)` can only be seen by points that saw
//! one of the two old faces on that edge; its conflict list is filtered from their
//! union.
//!
//! Point-to-face lists are pruned lazily: removed faces stay in them until read,
//! and `Mesh::contains_face` rejects the stale keys.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::check;
use crate::engine::HullEngine;
use crate::error::{HullError, Result};
use crate::geom::{HullCfg, HullFace, Point3, PointId};
use crate::mesh::{FaceKey, Mesh};
use crate::quickhull::{emit_simplex, find_simplex};

/// Conflict-graph engine; each `step` inserts one point.
#[derive(Debug, Default)]
pub struct Randomized {
    cfg: HullCfg,
    points: Vec<Point3>,
    run: Option<Run>,
    done: bool,
}

#[derive(Debug)]
struct Run {
    mesh: Mesh,
    eps: f64,
    order: Vec<PointId>,
    cursor: usize,
    face_conflicts: SecondaryMap<FaceKey, Vec<PointId>>,
    point_conflicts: Vec<Vec<FaceKey>>,
    skipped: usize,
}

impl Randomized {
    pub fn new(cfg: HullCfg) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    /// Points not yet inserted.
    pub fn remaining(&self) -> usize {
        self.run
            .as_ref()
            .map_or(0, |r| r.order.len() - r.cursor)
    }

    fn snapshot(&self) -> Vec<HullFace> {
        self.run
            .as_ref()
            .map_or_else(Vec::new, |r| r.mesh.snapshot())
    }
}

impl HullEngine for Randomized {
    fn initialize(&mut self, points: &[Point3]) {
        self.points = points.to_vec();
        self.run = None;
        self.done = false;
    }

    fn full_hull(&mut self) -> Result<Vec<HullFace>> {
        while !self.done {
            self.step()?;
        }
        Ok(self.snapshot())
    }

    fn step(&mut self) -> Result<Vec<HullFace>> {
        if self.done {
            return Ok(self.snapshot());
        }
        if self.run.is_none() {
            self.run = Some(Run::start(&self.points, &self.cfg)?);
            return Ok(self.snapshot());
        }
        let validate = self.cfg.validate;
        if let Some(run) = self.run.as_mut() {
            if !run.insert_next(validate)? {
                self.done = true;
                debug!(
                    faces = run.mesh.len(),
                    skipped = run.skipped,
                    "randomized done"
                );
                if validate {
                    run.validate_final()?;
                }
            }
        }
        Ok(self.snapshot())
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn name(&self) -> &'static str {
        "randomized"
    }
}

impl Run {
    fn start(points: &[Point3], cfg: &HullCfg) -> Result<Self> {
        let eps = cfg.tolerance(points)?;
        let simplex = find_simplex(points, eps)?;
        let mut mesh = Mesh::new(points.to_vec());
        let keys = emit_simplex(&mut mesh, simplex)?;

        let mut order: Vec<PointId> = (0..points.len())
            .map(PointId)
            .filter(|p| !simplex.contains(p))
            .collect();
        order.shuffle(&mut StdRng::seed_from_u64(cfg.seed));

        let mut face_conflicts = SecondaryMap::new();
        for k in keys {
            face_conflicts.insert(k, Vec::new());
        }
        let mut point_conflicts = vec![Vec::new(); points.len()];
        for &p in &order {
            for &k in &keys {
                if mesh.distance(k, p)? > eps {
                    if let Some(list) = face_conflicts.get_mut(k) {
                        list.push(p);
                    }
                    point_conflicts[p.idx()].push(k);
                }
            }
        }
        debug!(points = points.len(), seed = cfg.seed, eps, "randomized start");
        Ok(Self {
            mesh,
            eps,
            order,
            cursor: 0,
            face_conflicts,
            point_conflicts,
            skipped: 0,
        })
    }

    /// Insert the next point in order. Returns `false` once every point is processed.
    fn insert_next(&mut self, validate: bool) -> Result<bool> {
        let Some(&p) = self.order.get(self.cursor) else {
            return Ok(false);
        };
        self.cursor += 1;

        let visible: Vec<FaceKey> = std::mem::take(&mut self.point_conflicts[p.idx()])
            .into_iter()
            .filter(|&k| self.mesh.contains_face(k))
            .collect();
        if visible.is_empty() {
            self.skipped += 1;
            trace!(point = p.0, "interior");
            return Ok(true);
        }
        if visible.len() >= self.mesh.len() {
            return Err(HullError::CapacityExceeded {
                what: "visibility region",
                limit: self.mesh.len().saturating_sub(1),
            });
        }

        let mut in_region: SecondaryMap<FaceKey, ()> = SecondaryMap::new();
        for &f in &visible {
            in_region.insert(f, ());
        }
        let mut horizon = Vec::new();
        for &f in &visible {
            let face = self.mesh.get(f)?;
            if face.neighbors.len() != 3 {
                return Err(HullError::consistency(format!(
                    "face {f:?} has {} neighbors inside a closed hull",
                    face.neighbors.len()
                )));
            }
            for nb in &face.neighbors {
                if in_region.contains_key(nb.face) {
                    continue;
                }
                let mut candidates = Vec::new();
                for k in [f, nb.face] {
                    if let Some(list) = self.face_conflicts.get(k) {
                        candidates.extend(list.iter().copied().filter(|&q| q != p));
                    }
                }
                candidates.sort_unstable();
                candidates.dedup();
                horizon.push((nb.origin, nb.end, candidates));
            }
        }

        for &f in &visible {
            self.face_conflicts.remove(f);
            self.mesh.remove_face(f)?;
        }
        let horizon_len = horizon.len();
        for (origin, end, candidates) in horizon {
            let k = self.mesh.add_face(origin, end, p)?;
            let mut list = Vec::new();
            for q in candidates {
                if self.mesh.distance(k, q)? > self.eps {
                    list.push(q);
                    self.point_conflicts[q.idx()].push(k);
                }
            }
            self.face_conflicts.insert(k, list);
        }

        trace!(
            point = p.0,
            region = visible.len(),
            horizon = horizon_len,
            faces = self.mesh.len(),
            "insert"
        );
        if validate {
            self.mesh.check_consistency()?;
            if !self.mesh.is_closed() {
                return Err(HullError::consistency(format!(
                    "mesh open after inserting point {}",
                    p.0
                )));
            }
        }
        Ok(true)
    }

    fn validate_final(&self) -> Result<()> {
        self.mesh.check_consistency()?;
        let faces = self.mesh.snapshot();
        if let Some(p) = check::first_escaping_point(self.mesh.points(), &faces, self.eps) {
            return Err(HullError::consistency(format!(
                "point {} ended outside the hull",
                p.0
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
