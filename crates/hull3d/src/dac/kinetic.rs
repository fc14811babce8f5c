//! Arena-backed boundary chains and the kinetic merge.
//!
//! Each recursion level returns the *movie* of its lower hull: the sequence of
//! insert/delete events that the xy-projected chain undergoes while time sweeps
//! from −∞ to +∞. Every event `(prev, node, next)` is one lower-hull triangle.
//!
//! Link state is explicit: `prev`/`next` are `None` for a chain end or an
//! unlinked node. Replay data lives in the event records, never in the links.
//!
//! The merge needs distinct sweep coordinates and no four coplanar points.
//! `sweep_frame` maps the input into a fixed generic frame and jitters every point
//! by a hundredth of the tolerance; coplanar hull faces then come out
//! triangulated.

use nalgebra::Rotation3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::error::{HullError, Result};
use crate::geom::cfg::bounds;
use crate::geom::{kinetic_time, orientation, Point3, PointId};

/// Euler angles of the sweep frame; no small-integer direction lies in its axis planes.
const FRAME_ANGLES: (f64, f64, f64) = (0.318_309_886, 0.577_215_665, 0.271_828_183);
/// Jitter amplitude per coordinate as a fraction of the tolerance.
const JITTER_FRACTION: f64 = 1e-2;
const JITTER_SEED: u64 = 0x6a17_7e45;

/// Input centred on its bounding box, rotated into the sweep frame and jittered
/// by at most `JITTER_FRACTION * eps` per coordinate.
///
/// Coincident points make the merge ill-posed and are rejected; signed zeros
/// compare equal.
pub(crate) fn sweep_frame(points: &[Point3], eps: f64) -> Result<Vec<Point3>> {
    let clean: Vec<Point3> = points.iter().map(|p| p.map(|c| c + 0.0)).collect();
    let mut order: Vec<usize> = (0..clean.len()).collect();
    order.sort_by(|&i, &j| {
        let (a, b) = (&clean[i], &clean[j]);
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.z.total_cmp(&b.z))
    });
    if let Some(w) = order.windows(2).find(|w| clean[w[0]] == clean[w[1]]) {
        let (i, j) = (w[0].min(w[1]), w[0].max(w[1]));
        return Err(HullError::nontermination(format!("points {i} and {j} coincide")));
    }

    let (lo, hi) = bounds(&clean)?;
    let centre = (lo + hi) / 2.0;
    let (roll, pitch, yaw) = FRAME_ANGLES;
    let rot = Rotation3::from_euler_angles(roll, pitch, yaw);
    let amp = JITTER_FRACTION * eps;
    let mut rng = StdRng::seed_from_u64(JITTER_SEED);
    Ok(clean
        .iter()
        .map(|p| {
            let jitter = Point3::new(
                rng.gen_range(-amp..=amp),
                rng.gen_range(-amp..=amp),
                rng.gen_range(-amp..=amp),
            );
            rot * (p - centre) + jitter
        })
        .collect())
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub pos: Point3,
    pub id: PointId,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EventKind {
    Insert,
    Delete,
}

impl EventKind {
    fn inverse(self) -> Self {
        match self {
            EventKind::Insert => EventKind::Delete,
            EventKind::Delete => EventKind::Insert,
        }
    }
}

/// `node` enters between, or leaves from between, `prev` and `next`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Event {
    pub kind: EventKind,
    pub node: usize,
    pub prev: usize,
    pub next: usize,
}

/// Candidate events of one merge iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Candidate {
    Left,
    Right,
    InsertAfterU,
    DeleteU,
    InsertBeforeV,
    DeleteV,
}

const CANDIDATES: [Candidate; 6] = [
    Candidate::Left,
    Candidate::Right,
    Candidate::InsertAfterU,
    Candidate::DeleteU,
    Candidate::InsertBeforeV,
    Candidate::DeleteV,
];

/// Nodes sorted by `(x, y, z)`; ranges of the arena are recursion subproblems.
#[derive(Debug)]
pub(crate) struct Chains {
    nodes: Vec<Node>,
}

impl Chains {
    /// Sort sweep-frame `points` (with z scaled by `z_sign`) into an arena.
    pub fn new(points: &[Point3], z_sign: f64) -> Self {
        let mut nodes: Vec<Node> = points
            .iter()
            .enumerate()
            .map(|(i, p)| Node {
                pos: Point3::new(p.x, p.y, z_sign * p.z),
                id: PointId(i),
                prev: None,
                next: None,
            })
            .collect();
        nodes.sort_by(|a, b| {
            a.pos
                .x
                .total_cmp(&b.pos.x)
                .then(a.pos.y.total_cmp(&b.pos.y))
                .then(a.pos.z.total_cmp(&b.pos.z))
        });
        Self { nodes }
    }

    #[inline]
    pub fn id(&self, i: usize) -> PointId {
        self.nodes[i].id
    }

    #[inline]
    fn at(&self, i: Option<usize>) -> Option<&Point3> {
        i.map(|i| &self.nodes[i].pos)
    }

    #[inline]
    fn next(&self, i: usize) -> Option<usize> {
        self.nodes[i].next
    }

    #[inline]
    fn prev(&self, i: usize) -> Option<usize> {
        self.nodes[i].prev
    }

    fn turn(&self, p: Option<usize>, q: Option<usize>, r: Option<usize>) -> f64 {
        orientation(self.at(p), self.at(q), self.at(r))
    }

    fn time(&self, p: Option<usize>, q: Option<usize>, r: Option<usize>) -> f64 {
        kinetic_time(self.at(p), self.at(q), self.at(r))
    }

    fn event_time(&self, e: &Event) -> f64 {
        self.time(Some(e.prev), Some(e.node), Some(e.next))
    }

    fn apply(&mut self, e: &Event, kind: EventKind) {
        match kind {
            EventKind::Insert => {
                self.nodes[e.node].prev = Some(e.prev);
                self.nodes[e.node].next = Some(e.next);
                self.nodes[e.prev].next = Some(e.node);
                self.nodes[e.next].prev = Some(e.node);
            }
            EventKind::Delete => {
                self.nodes[e.prev].next = Some(e.next);
                self.nodes[e.next].prev = Some(e.prev);
                self.nodes[e.node].prev = None;
                self.nodes[e.node].next = None;
            }
        }
    }

    /// Lower-hull movie of the whole arena.
    pub fn lower_hull(&mut self) -> Result<Vec<Event>> {
        let n = self.nodes.len();
        self.hull(0, n)
    }

    /// Movie of `nodes[lo..lo + n]`; on return the chain links hold the hull at
    /// time −∞.
    fn hull(&mut self, lo: usize, n: usize) -> Result<Vec<Event>> {
        if n == 1 {
            self.nodes[lo].prev = None;
            self.nodes[lo].next = None;
            return Ok(Vec::new());
        }
        let half = n / 2;
        let left = self.hull(lo, half)?;
        let right = self.hull(lo + half, n - half)?;
        let (mut u, mut v) = self.bridge(lo + half - 1, lo + half, n)?;

        let cap = 2 * n;
        let max_iters = left.len() + right.len() + cap + 1;
        let mut log: Vec<Event> = Vec::with_capacity(cap);
        let (mut i, mut j) = (0usize, 0usize);
        let mut old = f64::NEG_INFINITY;
        let mut iters = 0usize;
        loop {
            iters += 1;
            if iters > max_iters {
                return Err(HullError::nontermination(format!(
                    "kinetic merge of {n} points exceeded {max_iters} iterations"
                )));
            }
            let times = [
                left.get(i).map_or(f64::INFINITY, |e| self.event_time(e)),
                right.get(j).map_or(f64::INFINITY, |e| self.event_time(e)),
                self.time(Some(u), self.next(u), Some(v)),
                self.time(self.prev(u), Some(u), Some(v)),
                self.time(Some(u), self.prev(v), Some(v)),
                self.time(Some(u), Some(v), self.next(v)),
            ];
            let mut best: Option<(Candidate, f64)> = None;
            for (c, &t) in CANDIDATES.iter().zip(times.iter()) {
                if t > old && best.map_or(t < f64::INFINITY, |(_, bt)| t < bt) {
                    best = Some((*c, t));
                }
            }
            let Some((cand, t)) = best else {
                break;
            };
            let logged = match cand {
                Candidate::Left => {
                    let e = left[i];
                    i += 1;
                    self.apply(&e, e.kind);
                    (self.nodes[e.node].pos.x < self.nodes[u].pos.x).then_some(e)
                }
                Candidate::Right => {
                    let e = right[j];
                    j += 1;
                    self.apply(&e, e.kind);
                    (self.nodes[e.node].pos.x > self.nodes[v].pos.x).then_some(e)
                }
                Candidate::InsertAfterU => {
                    let w = self.step_link(self.next(u), "u.next")?;
                    let e = Event {
                        kind: EventKind::Insert,
                        node: w,
                        prev: u,
                        next: v,
                    };
                    u = w;
                    Some(e)
                }
                Candidate::DeleteU => {
                    let p = self.step_link(self.prev(u), "u.prev")?;
                    let e = Event {
                        kind: EventKind::Delete,
                        node: u,
                        prev: p,
                        next: v,
                    };
                    u = p;
                    Some(e)
                }
                Candidate::InsertBeforeV => {
                    let w = self.step_link(self.prev(v), "v.prev")?;
                    let e = Event {
                        kind: EventKind::Insert,
                        node: w,
                        prev: u,
                        next: v,
                    };
                    v = w;
                    Some(e)
                }
                Candidate::DeleteV => {
                    let nx = self.step_link(self.next(v), "v.next")?;
                    let e = Event {
                        kind: EventKind::Delete,
                        node: v,
                        prev: u,
                        next: nx,
                    };
                    v = nx;
                    Some(e)
                }
            };
            if let Some(e) = logged {
                if log.len() >= cap {
                    return Err(HullError::CapacityExceeded {
                        what: "merge event log",
                        limit: cap,
                    });
                }
                trace!(?cand, t, node = e.node, "merge event");
                log.push(e);
            }
            old = t;
        }

        self.nodes[u].next = Some(v);
        self.nodes[v].prev = Some(u);
        for e in log.iter().rev() {
            self.apply(e, e.kind.inverse());
        }
        Ok(log)
    }

    /// Walk from the inner ends of both chains to the bridge valid at time −∞.
    fn bridge(&self, mut u: usize, mut v: usize, n: usize) -> Result<(usize, usize)> {
        for _ in 0..=2 * n {
            if self.turn(Some(u), Some(v), self.next(v)) < 0.0 {
                v = self.step_link(self.next(v), "bridge v.next")?;
            } else if self.turn(self.prev(u), Some(u), Some(v)) < 0.0 {
                u = self.step_link(self.prev(u), "bridge u.prev")?;
            } else {
                return Ok((u, v));
            }
        }
        Err(HullError::nontermination(format!(
            "no initial bridge after {} steps",
            2 * n + 1
        )))
    }

    /// A link that a finite event time guarantees to exist.
    fn step_link(&self, link: Option<usize>, what: &str) -> Result<usize> {
        link.ok_or_else(|| HullError::nontermination(format!("{what} is unlinked")))
    }
}
