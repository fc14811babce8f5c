//! Tolerance and run configuration.
//!
//! Policy
//! - One relative epsilon covers every inside/outside decision. The absolute value is
//!   derived per input from its bounding-box spread so that scaled or translated
//!   copies of an input produce the same combinatorial hull.
//! - Coordinates far from the origin lose absolute precision; a floor of a few ulps
//!   of the largest magnitude keeps such inputs from flickering across planes.

use super::types::Point3;
use crate::error::{HullError, Result};

/// Relative plane-distance tolerance; multiplied by the input extent.
pub const DEFAULT_EPS_REL: f64 = 1e-9;
/// Roundoff floor of the tolerance, in units of the largest coordinate's ulp.
pub const ROUNDOFF_ULPS: f64 = 16.0;
/// Shuffle seed for the randomized engine.
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct HullCfg {
    /// Relative tolerance; the absolute epsilon is about `eps_rel * extent(points)`.
    pub eps_rel: f64,
    /// Re-check mesh invariants after every expansion step.
    pub validate: bool,
    /// Seed for engines that randomize their insertion order.
    pub seed: u64,
}

impl Default for HullCfg {
    fn default() -> Self {
        Self {
            eps_rel: DEFAULT_EPS_REL,
            validate: cfg!(debug_assertions),
            seed: DEFAULT_SEED,
        }
    }
}

impl HullCfg {
    /// Absolute tolerance for `points`.
    ///
    /// `eps_rel * extent(points)` plus a roundoff floor proportional to the largest
    /// coordinate magnitude, so translated copies keep their hull. Fails on
    /// non-finite coordinates or an input collapsed onto a single point.
    pub fn tolerance(&self, points: &[Point3]) -> Result<f64> {
        let (lo, hi) = bounds(points)?;
        let e = (hi - lo).sum();
        if e <= 0.0 {
            return Err(HullError::degenerate("all points coincide"));
        }
        let magnitude = lo.abs().sup(&hi.abs()).max();
        Ok(self.eps_rel * e + ROUNDOFF_ULPS * f64::EPSILON * magnitude)
    }
}

/// Bounding-box spread `Δx + Δy + Δz` of `points`.
pub fn extent(points: &[Point3]) -> Result<f64> {
    let (lo, hi) = bounds(points)?;
    Ok((hi - lo).sum())
}

/// Componentwise bounding box. Empty input gives two zero corners.
pub fn bounds(points: &[Point3]) -> Result<(Point3, Point3)> {
    let Some(first) = points.first() else {
        return Ok((Point3::zeros(), Point3::zeros()));
    };
    let (mut lo, mut hi) = (*first, *first);
    for (i, p) in points.iter().enumerate() {
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return Err(HullError::degenerate(format!(
                "point {i} has a non-finite coordinate"
            )));
        }
        lo = lo.inf(p);
        hi = hi.sup(p);
    }
    Ok((lo, hi))
}
