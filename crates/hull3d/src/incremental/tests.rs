use super::*;
use crate::check::{canonical_faces, validate_hull};
use nalgebra::vector;
use rand::Rng;

fn cfg(seed: u64) -> HullCfg {
    HullCfg {
        validate: true,
        seed,
        ..HullCfg::default()
    }
}

fn random_points(n: usize, seed: u64) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            vector![
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0)
            ]
        })
        .collect()
}

fn run(points: &[Point3], seed: u64) -> Result<Vec<HullFace>> {
    let mut eng = Randomized::new(cfg(seed));
    eng.initialize(points);
    eng.full_hull()
}

#[test]
fn insertion_order_does_not_change_the_hull() {
    let pts = random_points(150, 2);
    let base = canonical_faces(&run(&pts, 0).unwrap());
    for seed in 1..6 {
        assert_eq!(canonical_faces(&run(&pts, seed).unwrap()), base);
    }
}

#[test]
fn cube_has_twelve_faces_for_any_order() {
    let mut pts = Vec::new();
    for x in [0.0, 1.0] {
        for y in [0.0, 1.0] {
            for z in [0.0, 1.0] {
                pts.push(vector![x, y, z]);
            }
        }
    }
    for seed in 0..8 {
        let faces = run(&pts, seed).unwrap();
        assert_eq!(faces.len(), 12);
        let eps = cfg(seed).tolerance(&pts).unwrap();
        validate_hull(&pts, &faces, eps).unwrap();
    }
}

#[test]
fn each_step_inserts_one_point() {
    let pts = random_points(80, 9);
    let mut eng = Randomized::new(cfg(3));
    eng.initialize(&pts);
    assert_eq!(eng.step().unwrap().len(), 4);
    assert_eq!(eng.remaining(), 76);
    let mut steps = 0;
    while !eng.is_done() {
        let before = eng.remaining();
        eng.step().unwrap();
        if !eng.is_done() {
            assert_eq!(eng.remaining(), before - 1);
        }
        steps += 1;
    }
    // 76 insertions plus the call that notices the order is exhausted.
    assert_eq!(steps, 77);
    let faces = eng.step().unwrap();
    assert_eq!(canonical_faces(&faces), canonical_faces(&run(&pts, 3).unwrap()));
}

#[test]
fn random_hulls_validate() {
    for seed in 0..15 {
        let pts = random_points(20 + 20 * seed as usize, 40 + seed);
        let faces = run(&pts, seed).unwrap();
        let eps = cfg(seed).tolerance(&pts).unwrap();
        validate_hull(&pts, &faces, eps).unwrap();
    }
}

#[test]
fn coplanar_input_is_degenerate() {
    let pts: Vec<Point3> = (0..10)
        .map(|i| {
            let t = i as f64;
            vector![t.cos(), t.sin(), 0.5 * t.cos() + 0.25 * t.sin()]
        })
        .collect();
    assert!(matches!(
        run(&pts, 0),
        Err(HullError::DegenerateInput { .. })
    ));
}
