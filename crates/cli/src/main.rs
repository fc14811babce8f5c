mod config;
mod provenance;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use hull3d::api::{canonical_faces, Algorithm, HullFace, Point3};
use hull3d::check::{edge_set, vertex_set};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::SubscriberBuilder;

use config::{Overrides, RunConfig};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "hull3d")]
#[command(about = "Build, step through and cross-check 3D convex hulls")]
struct Cmd {
    /// Optional JSON run config (points, dist, seed, algo, eps_rel); flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

/// Point-cloud flags shared by the subcommands.
#[derive(Args, Clone, Debug, Default)]
struct CloudArgs {
    #[arg(long)]
    points: Option<usize>,
    /// in-cube, in-sphere, on-sphere, normalized-sphere, many-internal
    #[arg(long)]
    dist: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    eps_rel: Option<f64>,
}

impl CloudArgs {
    fn overrides(self, algo: Option<String>) -> Overrides {
        Overrides {
            points: self.points,
            dist: self.dist,
            seed: self.seed,
            algo,
            eps_rel: self.eps_rel,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Build one hull and optionally write a JSON report plus provenance sidecar
    Run {
        #[arg(long)]
        algo: Option<String>,
        #[command(flatten)]
        cloud: CloudArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run every engine on the same cloud and check they agree
    Compare {
        #[command(flatten)]
        cloud: CloudArgs,
        /// Largest input the O(n^4) oracle is run on
        #[arg(long, default_value_t = 60)]
        oracle_max: usize,
    },
    /// Drive an engine one step at a time, logging the face count
    Step {
        #[arg(long)]
        algo: Option<String>,
        #[command(flatten)]
        cloud: CloudArgs,
        /// Pause between steps
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let base = RunConfig::load(cmd.config.as_deref())?;
    match cmd.action {
        Action::Run { algo, cloud, out } => run(base.overlay(cloud.overrides(algo)), out),
        Action::Compare { cloud, oracle_max } => {
            compare(base.overlay(cloud.overrides(None)), oracle_max)
        }
        Action::Step {
            algo,
            cloud,
            delay_ms,
        } => step(base.overlay(cloud.overrides(algo)), delay_ms),
        Action::Report => report(),
    }
}

/// JSON report of one hull.
#[derive(Serialize)]
struct HullReport {
    algo: String,
    points: usize,
    vertices: usize,
    edges: usize,
    faces: Vec<[usize; 3]>,
    normals: Vec<[f64; 3]>,
    elapsed_ms: f64,
}

impl HullReport {
    fn new(algo: Algorithm, points: &[Point3], faces: &[HullFace], elapsed: Duration) -> Self {
        Self {
            algo: algo.name().to_string(),
            points: points.len(),
            vertices: vertex_set(faces).len(),
            edges: edge_set(faces).len(),
            faces: faces.iter().map(|f| f.vertices.map(|v| v.0)).collect(),
            normals: faces
                .iter()
                .map(|f| [f.normal.x, f.normal.y, f.normal.z])
                .collect(),
            elapsed_ms: elapsed.as_secs_f64() * 1e3,
        }
    }
}

fn timed_hull(
    algo: Algorithm,
    cfg: &RunConfig,
    points: &[Point3],
) -> Result<(Vec<HullFace>, Duration)> {
    let mut engine = algo.engine(cfg.hull_cfg());
    engine.initialize(points);
    let start = Instant::now();
    let faces = engine
        .full_hull()
        .with_context(|| format!("{algo} on {} points", points.len()))?;
    Ok((faces, start.elapsed()))
}

fn run(cfg: RunConfig, out: Option<PathBuf>) -> Result<()> {
    let algo = cfg.algorithm()?;
    let points = cfg.sample()?;
    tracing::info!(algo = %algo, points = points.len(), dist = cfg.dist, seed = cfg.seed, "run");
    let (faces, elapsed) = timed_hull(algo, &cfg, &points)?;
    let report = HullReport::new(algo, &points, &faces, elapsed);
    tracing::info!(
        vertices = report.vertices,
        edges = report.edges,
        faces = faces.len(),
        elapsed_ms = report.elapsed_ms,
        "hull"
    );
    if let Some(out) = out {
        write_report(&out, &cfg, &report)?;
    }
    Ok(())
}

fn write_report(out: &Path, cfg: &RunConfig, report: &HullReport) -> Result<PathBuf> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(report)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let payload = Payload::new(serde_json::to_value(cfg)?).with_stats(serde_json::json!({
        "vertices": report.vertices,
        "edges": report.edges,
        "faces": report.faces.len(),
        "elapsed_ms": report.elapsed_ms,
    }));
    let prov = write_sidecar(out, payload)?;
    tracing::info!(report = %out.display(), provenance = %prov.display(), "wrote");
    Ok(prov)
}

fn compare(cfg: RunConfig, oracle_max: usize) -> Result<()> {
    let points = cfg.sample()?;
    let mut reference: Option<(Algorithm, _)> = None;
    let mut rows = Vec::new();
    let mut agree = true;
    for algo in Algorithm::ALL {
        if algo == Algorithm::Naive && points.len() > oracle_max {
            tracing::info!(points = points.len(), oracle_max, "skipping oracle");
            continue;
        }
        let (faces, elapsed) = timed_hull(algo, &cfg, &points)?;
        let canon = canonical_faces(&faces);
        let matches = match &reference {
            None => {
                reference = Some((algo, canon));
                true
            }
            Some((_, r)) => *r == canon,
        };
        agree &= matches;
        tracing::info!(
            algo = %algo,
            faces = faces.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            matches,
            "compare"
        );
        rows.push(serde_json::json!({
            "algo": algo.name(),
            "faces": faces.len(),
            "elapsed_ms": elapsed.as_secs_f64() * 1e3,
            "matches_reference": matches,
        }));
    }
    let summary = serde_json::json!({
        "points": points.len(),
        "dist": cfg.dist,
        "seed": cfg.seed,
        "reference": reference.as_ref().map(|(a, _)| a.name()),
        "engines": rows,
        "agree": agree,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if !agree {
        bail!("engines disagree on {} points (seed {})", points.len(), cfg.seed);
    }
    Ok(())
}

fn step(cfg: RunConfig, delay_ms: u64) -> Result<()> {
    let algo = cfg.algorithm()?;
    let points = cfg.sample()?;
    let mut engine = algo.engine(cfg.hull_cfg());
    engine.initialize(&points);
    let mut steps = 0usize;
    while !engine.is_done() {
        let faces = engine.step()?;
        steps += 1;
        tracing::info!(step = steps, faces = faces.len(), "step");
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
    }
    tracing::info!(algo = %algo, steps, "done");
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "hull3d_version": hull3d::VERSION,
        "algorithms": Algorithm::ALL.map(|a| a.name()),
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn small() -> RunConfig {
        RunConfig {
            points: 40,
            seed: 3,
            ..RunConfig::default()
        }
    }

    #[test]
    fn report_and_sidecar_are_written() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("hull.json");
        let cfg = small();
        let points = cfg.sample().unwrap();
        let (faces, elapsed) = timed_hull(Algorithm::QuickHull, &cfg, &points).unwrap();
        let report = HullReport::new(Algorithm::QuickHull, &points, &faces, elapsed);
        let prov = write_report(&out, &cfg, &report).unwrap();

        let parsed: Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed["points"], 40);
        assert_eq!(parsed["faces"].as_array().unwrap().len(), faces.len());
        // Euler: V - E + F = 2
        let (v, e, f) = (report.vertices as i64, report.edges as i64, faces.len() as i64);
        assert_eq!(v - e + f, 2);

        let side: Value = serde_json::from_slice(&std::fs::read(prov).unwrap()).unwrap();
        assert_eq!(side["params"]["points"], 40);
        assert_eq!(side["stats"]["faces"], faces.len());
    }

    #[test]
    fn compare_and_step_succeed_on_small_clouds() {
        compare(small(), 60).unwrap();
        for algo in ["quickhull", "dac", "randomized", "naive"] {
            let cfg = RunConfig {
                algo: algo.into(),
                ..small()
            };
            step(cfg, 0).unwrap();
        }
    }

    #[test]
    fn cli_parses_flags() {
        let cmd = Cmd::try_parse_from([
            "hull3d", "run", "--algo", "dac", "--points", "500", "--dist", "on-sphere",
        ])
        .unwrap();
        match cmd.action {
            Action::Run { algo, cloud, out } => {
                assert_eq!(algo.as_deref(), Some("dac"));
                assert_eq!(cloud.points, Some(500));
                assert!(out.is_none());
            }
            _ => panic!("expected run"),
        }
    }
}
