//! Run configuration: defaults, optional JSON file, then command-line overrides.

use anyhow::{Context, Result};
use hull3d::api::{
    draw_points, Algorithm, Distribution, HullCfg, Point3, ReplayToken, SampleParams,
};
use hull3d::geom::cfg::DEFAULT_EPS_REL;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub points: usize,
    pub dist: String,
    pub seed: u64,
    pub algo: String,
    pub eps_rel: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            points: 1000,
            dist: Distribution::InSphere.name().to_string(),
            seed: 0,
            algo: Algorithm::QuickHull.name().to_string(),
            eps_rel: DEFAULT_EPS_REL,
        }
    }
}

/// Flag values that override the file; `None` keeps the file/default value.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub points: Option<usize>,
    pub dist: Option<String>,
    pub seed: Option<u64>,
    pub algo: Option<String>,
    pub eps_rel: Option<f64>,
}

impl RunConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let bytes =
            std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn overlay(mut self, o: Overrides) -> Self {
        if let Some(v) = o.points {
            self.points = v;
        }
        if let Some(v) = o.dist {
            self.dist = v;
        }
        if let Some(v) = o.seed {
            self.seed = v;
        }
        if let Some(v) = o.algo {
            self.algo = v;
        }
        if let Some(v) = o.eps_rel {
            self.eps_rel = v;
        }
        self
    }

    pub fn algorithm(&self) -> Result<Algorithm> {
        self.algo.parse().map_err(anyhow::Error::msg)
    }

    pub fn hull_cfg(&self) -> HullCfg {
        HullCfg {
            eps_rel: self.eps_rel,
            seed: self.seed,
            ..HullCfg::default()
        }
    }

    pub fn sample(&self) -> Result<Vec<Point3>> {
        let params = SampleParams {
            count: self.points,
            dist: self.dist.parse()?,
            ..SampleParams::default()
        };
        let tok = ReplayToken {
            seed: self.seed,
            index: 0,
        };
        Ok(draw_points(&params, tok)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_fields_then_flags_win() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, r#"{"points": 64, "dist": "on-sphere", "seed": 9}"#).unwrap();
        let cfg = RunConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.points, 64);
        assert_eq!(cfg.dist, "on-sphere");
        assert_eq!(cfg.algo, "quickhull");

        let cfg = cfg.overlay(Overrides {
            seed: Some(1),
            algo: Some("dac".into()),
            ..Overrides::default()
        });
        assert_eq!(cfg.seed, 1);
        assert_eq!(cfg.points, 64);
        assert_eq!(cfg.algorithm().unwrap(), Algorithm::DivideConquer);
        assert_eq!(cfg.sample().unwrap().len(), 64);
    }

    #[test]
    fn bad_inputs_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(RunConfig::load(Some(&path)).is_err());
        assert!(RunConfig::load(Some(&dir.path().join("missing.json"))).is_err());

        let cfg = RunConfig {
            algo: "bogo".into(),
            dist: "torus".into(),
            ..RunConfig::default()
        };
        assert!(cfg.algorithm().is_err());
        assert!(cfg.sample().is_err());
    }
}
