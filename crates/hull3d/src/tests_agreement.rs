//! Cross-engine properties on random inputs, including ones with shared coordinates.

use crate::check::{canonical_faces, contains_all, euler_characteristic, normals_outward};
use crate::engine::{convex_hull, Algorithm};
use crate::geom::{HullCfg, Point3};
use crate::sample::{draw_points, Distribution, ReplayToken, SampleParams};
use nalgebra::vector;
use proptest::prelude::*;

fn cfg() -> HullCfg {
    HullCfg {
        validate: true,
        ..HullCfg::default()
    }
}

fn point_cloud(max: usize) -> impl Strategy<Value = Vec<Point3>> {
    prop::collection::vec(
        (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0).prop_map(|(x, y, z)| vector![x, y, z]),
        6..max,
    )
}

/// Clouds whose points come in pairs sharing their x or their y coordinate.
fn tied_cloud(max_pairs: usize) -> impl Strategy<Value = Vec<Point3>> {
    prop::collection::vec(
        (
            (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0),
            (-1.0f64..1.0, -1.0f64..1.0),
            any::<bool>(),
        ),
        3..max_pairs,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .flat_map(|((x, y, z), (free, z2), share_x)| {
                let twin = if share_x {
                    vector![x, free, z2]
                } else {
                    vector![free, y, z2]
                };
                [vector![x, y, z], twin]
            })
            .collect()
    })
}

/// Reject inputs with nearly coincident points.
fn well_spread(points: &[Point3]) -> bool {
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            if (points[i] - points[j]).norm() < 1e-3 {
                return false;
            }
        }
    }
    true
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn engines_agree_with_oracle(points in point_cloud(28)) {
        prop_assume!(well_spread(&points));
        let oracle = convex_hull(&points, Algorithm::Naive, cfg());
        prop_assume!(oracle.is_ok());
        let oracle = canonical_faces(&oracle.unwrap());
        for algo in [Algorithm::QuickHull, Algorithm::DivideConquer, Algorithm::Randomized] {
            let faces = convex_hull(&points, algo, cfg()).unwrap();
            prop_assert_eq!(&canonical_faces(&faces), &oracle, "{} disagrees", algo);
        }
    }

    #[test]
    fn engines_agree_on_shared_coordinates(points in tied_cloud(14)) {
        prop_assume!(well_spread(&points));
        let oracle = convex_hull(&points, Algorithm::Naive, cfg());
        prop_assume!(oracle.is_ok());
        let oracle = canonical_faces(&oracle.unwrap());
        for algo in [Algorithm::QuickHull, Algorithm::DivideConquer, Algorithm::Randomized] {
            let faces = convex_hull(&points, algo, cfg()).unwrap();
            prop_assert_eq!(&canonical_faces(&faces), &oracle, "{} disagrees", algo);
        }
    }

    #[test]
    fn hulls_are_closed_outward_and_contain_everything(points in point_cloud(120)) {
        prop_assume!(well_spread(&points));
        let eps = cfg().tolerance(&points).unwrap();
        for algo in [Algorithm::QuickHull, Algorithm::DivideConquer, Algorithm::Randomized] {
            let faces = convex_hull(&points, algo, cfg()).unwrap();
            prop_assert_eq!(euler_characteristic(&faces), 2);
            prop_assert!(normals_outward(&points, &faces));
            prop_assert!(contains_all(&points, &faces, eps));
        }
    }
}

#[test]
fn distributions_agree_across_engines() {
    for (i, dist) in Distribution::ALL.into_iter().enumerate() {
        let params = SampleParams {
            count: 400,
            dist,
            min: -50.0,
            max: 50.0,
        };
        let pts = draw_points(&params, ReplayToken { seed: 2024, index: i as u64 }).unwrap();
        let qh = canonical_faces(&convex_hull(&pts, Algorithm::QuickHull, cfg()).unwrap());
        let dc = canonical_faces(&convex_hull(&pts, Algorithm::DivideConquer, cfg()).unwrap());
        let rnd = canonical_faces(&convex_hull(&pts, Algorithm::Randomized, cfg()).unwrap());
        assert_eq!(qh, dc, "{dist}");
        assert_eq!(qh, rnd, "{dist}");
    }
}

#[test]
fn step_sequence_equals_full_run_for_every_engine() {
    let params = SampleParams {
        count: 60,
        dist: Distribution::InCube,
        min: -1.0,
        max: 1.0,
    };
    let pts = draw_points(&params, ReplayToken { seed: 5, index: 0 }).unwrap();
    for algo in Algorithm::ALL {
        let full = convex_hull(&pts, algo, cfg()).unwrap();
        let mut eng = algo.engine(cfg());
        eng.initialize(&pts);
        let mut last = Vec::new();
        let mut guard = 0;
        while !eng.is_done() {
            last = eng.step().unwrap();
            guard += 1;
            assert!(guard < 100_000, "{algo} never finished");
        }
        assert_eq!(canonical_faces(&last), canonical_faces(&full), "{algo}");
        assert_eq!(eng.step().unwrap(), last, "{algo}");
    }
}
