//! Reproducible point distributions.
//!
//! Purpose
//! - Deterministic point clouds: uniform in a cube or ball, on a sphere, or a dense
//!   interior cluster wrapped by a few hull points.
//!
//! Model
//! - Determinism uses a replay token `(seed, index)` mixed into a single `StdRng`;
//!   the same token always yields the same cloud.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::geom::Point3;

/// Points placed on the enclosing sphere by [`Distribution::ManyInternal`].
pub const MANY_INTERNAL_SHELL: usize = 50;
/// Radius of [`Distribution::NormalizedSphere`].
pub const NORMALIZED_RADIUS: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error("invalid sample params: {0}")]
    InvalidParams(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Distribution {
    /// Uniform in `[min, max]³`.
    InCube,
    /// Uniform direction, radius uniform in `[min, max]`.
    InSphere,
    /// Uniform on the sphere of radius `max / 2`.
    OnSphere,
    /// Cube samples projected onto a sphere of radius 100.
    NormalizedSphere,
    /// Dense cube cluster at 1/5 scale plus 50 points on a sphere of radius
    /// `max / 2` around the cluster mean.
    ManyInternal,
}

impl Distribution {
    pub const ALL: [Distribution; 5] = [
        Distribution::InCube,
        Distribution::InSphere,
        Distribution::OnSphere,
        Distribution::NormalizedSphere,
        Distribution::ManyInternal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Distribution::InCube => "in-cube",
            Distribution::InSphere => "in-sphere",
            Distribution::OnSphere => "on-sphere",
            Distribution::NormalizedSphere => "normalized-sphere",
            Distribution::ManyInternal => "many-internal",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Distribution {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Distribution::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SampleError::InvalidParams(format!("unknown distribution `{s}`")))
    }
}

/// Sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleParams {
    pub count: usize,
    pub dist: Distribution,
    pub min: f64,
    pub max: f64,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            count: 1000,
            dist: Distribution::InSphere,
            min: -100.0,
            max: 100.0,
        }
    }
}

impl SampleParams {
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.count < 4 {
            return Err(SampleError::InvalidParams(format!(
                "need at least 4 points, got {}",
                self.count
            )));
        }
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(SampleError::InvalidParams("bounds must be finite".into()));
        }
        if self.min >= self.max {
            return Err(SampleError::InvalidParams("min < max required".into()));
        }
        if self.dist == Distribution::ManyInternal && self.count <= MANY_INTERNAL_SHELL {
            return Err(SampleError::InvalidParams(format!(
                "many-internal needs more than {MANY_INTERNAL_SHELL} points"
            )));
        }
        Ok(())
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw `params.count` points.
pub fn draw_points(params: &SampleParams, tok: ReplayToken) -> Result<Vec<Point3>, SampleError> {
    params.validate()?;
    let mut rng = tok.to_std_rng();
    let (min, max) = (params.min, params.max);
    let n = params.count;
    let pts: Vec<Point3> = match params.dist {
        Distribution::InCube => (0..n).map(|_| in_cube(&mut rng, min, max)).collect(),
        Distribution::InSphere => (0..n)
            .map(|_| unit_direction(&mut rng) * rng.gen_range(min..max))
            .collect(),
        Distribution::OnSphere => (0..n)
            .map(|_| unit_direction(&mut rng) * (max / 2.0))
            .collect(),
        Distribution::NormalizedSphere => {
            let mut out = Vec::with_capacity(n);
            while out.len() < n {
                let p = in_cube(&mut rng, min, max);
                let len = p.norm();
                if len > 0.0 {
                    out.push(p / len * NORMALIZED_RADIUS);
                }
            }
            out
        }
        Distribution::ManyInternal => {
            let inner = n - MANY_INTERNAL_SHELL;
            let mut out: Vec<Point3> = (0..inner)
                .map(|_| in_cube(&mut rng, min / 5.0, max / 5.0))
                .collect();
            let mean = out.iter().fold(Point3::zeros(), |acc, p| acc + p) / inner as f64;
            out.extend(
                (0..MANY_INTERNAL_SHELL).map(|_| mean + unit_direction(&mut rng) * (max / 2.0)),
            );
            out
        }
    };
    Ok(pts)
}

fn in_cube(rng: &mut StdRng, min: f64, max: f64) -> Point3 {
    Point3::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// Uniform direction via inverse-CDF polar angle.
fn unit_direction(rng: &mut StdRng) -> Point3 {
    let theta = 2.0 * PI * rng.gen::<f64>();
    let phi = (1.0 - 2.0 * rng.gen::<f64>()).acos();
    Point3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}
