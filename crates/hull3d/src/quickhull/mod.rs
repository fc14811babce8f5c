//! Outside-set (QuickHull) engine.
//!
//! Purpose
//! - Grow the hull from an initial tetrahedron toward the furthest outside point of
//!   one face at a time, replacing the visible region by a fan over its horizon.
//!
//! Cycle
//! - SelectFace: first face in creation order with a non-empty outside set.
//! - Expand: flood the faces that see the apex, starting at the selected face.
//! - FindHorizon: region edges whose neighbor is not in the region.
//! - Prune, then erect one face `(origin, end, apex)` per horizon edge.
//! - Redistribute: every orphaned point goes to the first new face it is outside
//!   of; points outside none are interior and dropped.
//!
//! Why this design
//! - Faces are pruned before the fan is erected so every face keeps at most three
//!   neighbors throughout. Stable handles make the order otherwise irrelevant.
//! - Outside sets and visited markers are run state (`SecondaryMap`s keyed by face),
//!   not face fields; they vanish with the run.
//!
//! References
//! - Barber, Dobkin, Huhdanpaa: "The Quickhull algorithm for convex hulls" (1996).

mod simplex;

pub(crate) use simplex::{emit_simplex, find_simplex};

use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::check;
use crate::engine::HullEngine;
use crate::error::{HullError, Result};
use crate::geom::{HullCfg, HullFace, Point3, PointId};
use crate::mesh::{FaceKey, Mesh};

/// Incremental outside-set engine with single-cycle stepping.
#[derive(Debug, Default)]
pub struct QuickHull {
    cfg: HullCfg,
    points: Vec<Point3>,
    run: Option<Run>,
    done: bool,
}

#[derive(Debug)]
struct Run {
    mesh: Mesh,
    eps: f64,
    outside: SecondaryMap<FaceKey, Vec<PointId>>,
    visited: SecondaryMap<FaceKey, ()>,
    cycles: usize,
}

impl QuickHull {
    pub fn new(cfg: HullCfg) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    /// Number of completed expansion cycles in the current run.
    pub fn cycles(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.cycles)
    }

    /// Total points still waiting in some outside set.
    pub fn pending_points(&self) -> usize {
        self.run
            .as_ref()
            .map_or(0, |r| r.outside.values().map(Vec::len).sum())
    }

    fn snapshot(&self) -> Vec<HullFace> {
        self.run
            .as_ref()
            .map_or_else(Vec::new, |r| r.mesh.snapshot())
    }

    fn finish(&mut self) -> Result<()> {
        self.done = true;
        if let Some(run) = &self.run {
            debug!(cycles = run.cycles, faces = run.mesh.len(), "quickhull done");
            if self.cfg.validate {
                run.validate_final()?;
            }
        }
        Ok(())
    }
}

impl HullEngine for QuickHull {
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
        let progressed = match self.run.as_mut() {
            Some(run) => run.cycle(validate)?,
            None => false,
        };
        if !progressed {
            self.finish()?;
        }
        Ok(self.snapshot())
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn name(&self) -> &'static str {
        "quickhull"
    }
}

impl Run {
    /// BuildSimplex + AssignOutsideSets.
    fn start(points: &[Point3], cfg: &HullCfg) -> Result<Self> {
        let eps = cfg.tolerance(points)?;
        let simplex = find_simplex(points, eps)?;
        let mut mesh = Mesh::new(points.to_vec());
        let keys = emit_simplex(&mut mesh, simplex)?;

        let mut outside = SecondaryMap::new();
        for k in keys {
            outside.insert(k, Vec::new());
        }
        let mut assigned = 0usize;
        for i in 0..points.len() {
            let p = PointId(i);
            if simplex.contains(&p) {
                continue;
            }
            if let Some(k) = first_outside(&mesh, &keys, p, eps)? {
                if let Some(set) = outside.get_mut(k) {
                    set.push(p);
                    assigned += 1;
                }
            }
        }
        debug!(points = points.len(), assigned, eps, "quickhull start");
        Ok(Self {
            mesh,
            eps,
            outside,
            visited: SecondaryMap::new(),
            cycles: 0,
        })
    }

    /// One SelectFace → Prune cycle. Returns `false` when no outside point remains.
    fn cycle(&mut self, validate: bool) -> Result<bool> {
        let Some(selected) = self.select_face() else {
            return Ok(false);
        };
        let apex = self.furthest(selected)?;
        let region = self.expand(selected, apex)?;
        let horizon = self.horizon(&region)?;

        let mut orphans = Vec::new();
        for &f in &region {
            if let Some(set) = self.outside.remove(f) {
                orphans.extend(set.into_iter().filter(|&p| p != apex));
            }
            self.mesh.remove_face(f)?;
        }

        let mut fan = Vec::with_capacity(horizon.len());
        for &(origin, end) in &horizon {
            let k = self.mesh.add_face(origin, end, apex)?;
            self.outside.insert(k, Vec::new());
            fan.push(k);
        }

        let mut dropped = 0usize;
        for p in orphans {
            match first_outside(&self.mesh, &fan, p, self.eps)? {
                Some(k) => {
                    if let Some(set) = self.outside.get_mut(k) {
                        set.push(p);
                    }
                }
                None => dropped += 1,
            }
        }

        self.cycles += 1;
        debug!(
            cycle = self.cycles,
            apex = apex.0,
            region = region.len(),
            horizon = horizon.len(),
            dropped,
            faces = self.mesh.len(),
            "quickhull cycle"
        );
        if validate {
            self.mesh.check_consistency()?;
            if !self.mesh.is_closed() {
                return Err(HullError::consistency(format!(
                    "mesh open after cycle {}",
                    self.cycles
                )));
            }
        }
        Ok(true)
    }

    fn select_face(&self) -> Option<FaceKey> {
        self.mesh
            .keys()
            .find(|&k| self.outside.get(k).is_some_and(|s| !s.is_empty()))
    }

    fn furthest(&self, face: FaceKey) -> Result<PointId> {
        let f = self.mesh.get(face)?;
        let set = self
            .outside
            .get(face)
            .ok_or_else(|| HullError::consistency("selected face has no outside set"))?;
        let mut best: Option<(PointId, f64)> = None;
        for &p in set {
            let d = f.distance(self.mesh.point(p));
            if best.map_or(true, |(_, bd)| d > bd) {
                best = Some((p, d));
            }
        }
        best.map(|(p, _)| p)
            .ok_or_else(|| HullError::consistency("selected face has an empty outside set"))
    }

    /// Faces reachable from `start` through neighbors that also see `apex`.
    fn expand(&mut self, start: FaceKey, apex: PointId) -> Result<Vec<FaceKey>> {
        self.visited.clear();
        self.visited.insert(start, ());
        let limit = self.mesh.len().saturating_sub(1);
        let mut region = vec![start];
        let mut stack = vec![start];
        while let Some(f) = stack.pop() {
            let face = self.mesh.get(f)?;
            if face.neighbors.len() != 3 {
                return Err(HullError::consistency(format!(
                    "face {f:?} has {} neighbors inside a closed hull",
                    face.neighbors.len()
                )));
            }
            for nb in &face.neighbors {
                if self.visited.contains_key(nb.face) {
                    continue;
                }
                self.visited.insert(nb.face, ());
                if self.mesh.distance(nb.face, apex)? > self.eps {
                    if region.len() >= limit {
                        return Err(HullError::CapacityExceeded {
                            what: "visibility region",
                            limit,
                        });
                    }
                    region.push(nb.face);
                    stack.push(nb.face);
                }
            }
        }
        trace!(apex = apex.0, region = region.len(), "expand");
        Ok(region)
    }

    /// Directed edges `(origin, end)` of region faces whose neighbor lies outside
    /// the region.
    fn horizon(&self, region: &[FaceKey]) -> Result<Vec<(PointId, PointId)>> {
        let mut in_region: SecondaryMap<FaceKey, ()> = SecondaryMap::new();
        for &f in region {
            in_region.insert(f, ());
        }
        let mut edges = Vec::new();
        for &f in region {
            for nb in &self.mesh.get(f)?.neighbors {
                if !in_region.contains_key(nb.face) {
                    edges.push((nb.origin, nb.end));
                }
            }
        }
        if edges.len() < 3 {
            return Err(HullError::consistency(format!(
                "horizon with {} edges",
                edges.len()
            )));
        }
        Ok(edges)
    }

    /// Every point is a hull vertex or weakly inside every face.
    fn validate_final(&self) -> Result<()> {
        self.mesh.check_consistency()?;
        let faces = self.mesh.snapshot();
        if let Some(p) = check::first_escaping_point(self.mesh.points(), &faces, self.eps) {
            return Err(HullError::consistency(format!(
                "point {} is neither on the hull nor in any outside set",
                p.0
            )));
        }
        Ok(())
    }
}

/// First face among `candidates` that `p` lies strictly outside of (beyond `eps`).
pub(crate) fn first_outside(
    mesh: &Mesh,
    candidates: &[FaceKey],
    p: PointId,
    eps: f64,
) -> Result<Option<FaceKey>> {
    for &k in candidates {
        if mesh.distance(k, p)? > eps {
            return Ok(Some(k));
        }
    }
    Ok(None)
}
