use super::cfg::extent;
use super::*;
use crate::error::HullError;
use nalgebra::vector;

#[test]
fn orientation_sign_follows_xy_winding() {
    let p = vector![0.0, 0.0, 5.0];
    let q = vector![1.0, 0.0, -2.0];
    let r = vector![0.0, 1.0, 7.0];
    assert!((orientation(Some(&p), Some(&q), Some(&r)) - 1.0).abs() < 1e-12);
    assert!((orientation(Some(&p), Some(&r), Some(&q)) + 1.0).abs() < 1e-12);
    // A missing endpoint always counts as convex.
    assert_eq!(orientation(None, Some(&q), Some(&r)), 1.0);
    assert_eq!(orientation(Some(&p), Some(&q), None), 1.0);
}

#[test]
fn kinetic_time_is_ratio_of_areas() {
    let p = vector![0.0, 0.0, 0.0];
    let q = vector![1.0, 0.0, 0.0];
    let r = vector![0.0, 2.0, 3.0];
    // xz area 3, xy area 2
    assert!((kinetic_time(Some(&p), Some(&q), Some(&r)) - 1.5).abs() < 1e-12);
    assert_eq!(kinetic_time(Some(&p), None, Some(&r)), f64::INFINITY);
    // Collinear in xy: no transition.
    let s = vector![2.0, 0.0, 1.0];
    assert_eq!(kinetic_time(Some(&p), Some(&q), Some(&s)), f64::INFINITY);
}

#[test]
fn newell_normal_unit_and_degenerate_zero() {
    let tri = [
        vector![0.0, 0.0, 0.0],
        vector![2.0, 0.0, 0.0],
        vector![0.0, 3.0, 0.0],
    ];
    let n = newell_normal(&tri);
    assert!((n - vector![0.0, 0.0, 1.0]).norm() < 1e-12);
    let flipped = newell_normal(&[tri[0], tri[2], tri[1]]);
    assert!((flipped + n).norm() < 1e-12);

    let line = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 1.0, 1.0],
        vector![2.0, 2.0, 2.0],
    ];
    let z = newell_normal(&line);
    assert_eq!(z, nalgebra::Vector3::zeros());
    assert!(!z.x.is_nan());
}

#[test]
fn signed_distance_and_segment_distance() {
    let n = vector![0.0, 0.0, 1.0];
    let o = vector![1.0, 1.0, 1.0];
    assert!((signed_distance(&n, &o, &vector![5.0, -3.0, 4.0]) - 3.0).abs() < 1e-12);
    assert!((signed_distance(&n, &o, &vector![0.0, 0.0, -1.0]) + 2.0).abs() < 1e-12);

    let a = vector![0.0, 0.0, 0.0];
    let b = vector![2.0, 0.0, 0.0];
    // Perpendicular foot inside the segment.
    assert!((segment_distance_sq(&a, &b, &vector![1.0, 3.0, 0.0]) - 9.0).abs() < 1e-12);
    // Beyond either endpoint the nearest endpoint counts.
    assert!((segment_distance_sq(&a, &b, &vector![-1.0, 1.0, 0.0]) - 2.0).abs() < 1e-12);
    assert!((segment_distance_sq(&a, &b, &vector![4.0, 0.0, 0.0]) - 4.0).abs() < 1e-12);
}

#[test]
fn tolerance_scales_with_extent() {
    let cfg = HullCfg::default();
    let small = vec![vector![0.001, -0.002, 0.0], vector![0.0, 0.0, 0.003]];
    let big: Vec<Point3> = small.iter().map(|p| p * 1e6).collect();
    let es = cfg.tolerance(&small).unwrap();
    let eb = cfg.tolerance(&big).unwrap();
    assert!((extent(&small).unwrap() - 0.006).abs() < 1e-15);
    assert!((eb / es - 1e6).abs() < 1e-3);
}

#[test]
fn tolerance_follows_spread_not_position() {
    let cfg = HullCfg::default();
    let cloud = vec![vector![-1.0, 0.0, 0.5], vector![1.0, 2.0, -0.5]];
    let far: Vec<Point3> = cloud.iter().map(|p| p + vector![1e6, -1e6, 1e6]).collect();
    assert!((extent(&far).unwrap() - 5.0).abs() < 1e-9);
    let near = cfg.tolerance(&cloud).unwrap();
    let shifted = cfg.tolerance(&far).unwrap();
    assert!((near - 5e-9).abs() < 1e-12);
    // Only the roundoff floor grows with the offset.
    assert!(shifted > near && shifted < 1e-7);
}

#[test]
fn tolerance_rejects_bad_inputs() {
    let cfg = HullCfg::default();
    let zeros = vec![Point3::zeros(); 5];
    assert!(matches!(
        cfg.tolerance(&zeros),
        Err(HullError::DegenerateInput { .. })
    ));
    let nan = vec![vector![0.0, f64::NAN, 1.0]];
    assert!(matches!(
        cfg.tolerance(&nan),
        Err(HullError::DegenerateInput { .. })
    ));
}

#[test]
fn hull_face_distance_and_sorted_ids() {
    let pts = vec![
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
    ];
    let f = HullFace::from_points(&pts, [PointId(2), PointId(0), PointId(1)]);
    assert_eq!(f.sorted_ids(), [0, 1, 2]);
    assert!((f.distance(&vector![0.3, 0.3, 2.0]) - 2.0).abs() < 1e-12);
    assert!((f.centroid - vector![1.0 / 3.0, 1.0 / 3.0, 0.0]).norm() < 1e-12);
}
