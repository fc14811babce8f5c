//! Engine lifecycle shared by every hull algorithm.
//!
//! A driver calls `initialize`, then either `full_hull` or `step` any number of
//! times. `step` after completion is a no-op that returns the final faces.

use std::fmt;
use std::str::FromStr;

use crate::dac::DivideConquer;
use crate::error::Result;
use crate::geom::{HullCfg, HullFace, Point3};
use crate::incremental::Randomized;
use crate::naive::Naive;
use crate::quickhull::QuickHull;

/// Synchronous hull construction with coarse-grained stepping.
pub trait HullEngine {
    /// Reset all run state and take a copy of `points`. Point `i` gets id `i`.
    fn initialize(&mut self, points: &[Point3]);

    /// Run to completion and return the outward-wound faces.
    fn full_hull(&mut self) -> Result<Vec<HullFace>>;

    /// Perform one bounded unit of work and return the current, possibly partial, faces.
    fn step(&mut self) -> Result<Vec<HullFace>>;

    fn is_done(&self) -> bool;

    fn name(&self) -> &'static str;
}

/// Available algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    QuickHull,
    DivideConquer,
    Randomized,
    Naive,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::QuickHull,
        Algorithm::DivideConquer,
        Algorithm::Randomized,
        Algorithm::Naive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::QuickHull => "quickhull",
            Algorithm::DivideConquer => "dac",
            Algorithm::Randomized => "randomized",
            Algorithm::Naive => "naive",
        }
    }

    pub fn engine(self, cfg: HullCfg) -> Box<dyn HullEngine> {
        match self {
            Algorithm::QuickHull => Box::new(QuickHull::new(cfg)),
            Algorithm::DivideConquer => Box::new(DivideConquer::new(cfg)),
            Algorithm::Randomized => Box::new(Randomized::new(cfg)),
            Algorithm::Naive => Box::new(Naive::new(cfg)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quickhull" | "qh" => Ok(Algorithm::QuickHull),
            "dac" | "divide-conquer" | "divideconquer" => Ok(Algorithm::DivideConquer),
            "randomized" | "incremental" => Ok(Algorithm::Randomized),
            "naive" => Ok(Algorithm::Naive),
            other => Err(format!(
                "unknown algorithm `{other}` (expected quickhull, dac, randomized or naive)"
            )),
        }
    }
}

/// One-shot convenience: build the hull of `points` with `algo`.
pub fn convex_hull(points: &[Point3], algo: Algorithm, cfg: HullCfg) -> Result<Vec<HullFace>> {
    let mut engine = algo.engine(cfg);
    engine.initialize(points);
    engine.full_hull()
}
