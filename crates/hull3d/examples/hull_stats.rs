//! Face/vertex counts per distribution for a quick sanity look.
//!
//! Usage:
//!   cargo run -p hull3d --example hull_stats -- [points]
//!
//! Prints one line per distribution with (V, E, F) of the QuickHull result and
//! whether the divide-and-conquer engine agrees.

use hull3d::api::{
    canonical_faces, convex_hull, draw_points, Algorithm, Distribution, HullCfg, ReplayToken,
    SampleParams,
};
use hull3d::check::{edge_set, vertex_set};

fn main() {
    let count = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2_000usize);
    let cfg = HullCfg::default();
    for (i, dist) in Distribution::ALL.into_iter().enumerate() {
        let params = SampleParams {
            count,
            dist,
            ..SampleParams::default()
        };
        let pts = match draw_points(&params, ReplayToken { seed: 2025, index: i as u64 }) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{dist}: {e}");
                continue;
            }
        };
        let qh = convex_hull(&pts, Algorithm::QuickHull, cfg).unwrap();
        let dc = convex_hull(&pts, Algorithm::DivideConquer, cfg).unwrap();
        println!(
            "{dist:>18}: V={:5} E={:5} F={:5} dac_agrees={}",
            vertex_set(&qh).len(),
            edge_set(&qh).len(),
            qh.len(),
            canonical_faces(&qh) == canonical_faces(&dc)
        );
    }
}
