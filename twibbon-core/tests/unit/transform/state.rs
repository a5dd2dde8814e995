use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn base_fit_inscribes_photo() {
    let mut t = TransformState::default();
    assert!(t.set_base_fit(400.0, 300.0, 500.0, 500.0));
    assert!(approx(t.base_fit_scale(), 1.25));

    assert!(t.set_base_fit(1000.0, 250.0, 500.0, 500.0));
    assert!(approx(t.base_fit_scale(), 0.5));
}

#[test]
fn base_fit_rejects_non_positive_dimensions() {
    let mut t = TransformState::default();
    assert!(t.set_base_fit(400.0, 300.0, 500.0, 500.0));

    assert!(!t.set_base_fit(0.0, 300.0, 500.0, 500.0));
    assert!(!t.set_base_fit(400.0, -1.0, 500.0, 500.0));
    assert!(!t.set_base_fit(400.0, 300.0, 0.0, 500.0));
    assert!(!t.set_base_fit(400.0, 300.0, 500.0, f64::NAN));
    assert!(approx(t.base_fit_scale(), 1.25));
}

#[test]
fn pan_accumulates_without_bounds() {
    let mut t = TransformState::default();
    t.pan_by(10.0, -4.0);
    t.pan_by(1e6, 3.0);
    assert_eq!(t.pan(), Vec2::new(1_000_010.0, -1.0));
}

#[test]
fn three_wheel_steps_then_clamp() {
    let mut t = TransformState::default();
    for _ in 0..3 {
        t.zoom_by(1.1);
    }
    assert!(approx(t.scale(), 1.331));

    t.zoom_by(6.0545 / 1.331);
    assert_eq!(t.scale(), MAX_SCALE);
}

#[test]
fn every_scale_mutation_stays_in_band() {
    let inputs = [
        -10.0,
        -0.0,
        0.0,
        1e-12,
        0.49,
        0.5,
        1.0,
        4.99,
        5.0,
        5.01,
        1e12,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
    ];
    let mut t = TransformState::default();
    for &v in &inputs {
        t.zoom_to(v);
        assert!((MIN_SCALE..=MAX_SCALE).contains(&t.scale()), "zoom_to({v})");
        t.zoom_by(v);
        assert!((MIN_SCALE..=MAX_SCALE).contains(&t.scale()), "zoom_by({v})");
    }
}

#[test]
fn out_of_band_values_truncate_to_nearest_bound() {
    let mut t = TransformState::default();
    t.zoom_to(0.1);
    assert_eq!(t.scale(), MIN_SCALE);
    t.zoom_to(9.0);
    assert_eq!(t.scale(), MAX_SCALE);
    t.zoom_by(0.01);
    assert_eq!(t.scale(), MIN_SCALE);
}

#[test]
fn reset_restores_defaults() {
    let mut t = TransformState::default();
    t.set_base_fit(400.0, 300.0, 500.0, 500.0);
    t.pan_by(3.0, 4.0);
    t.zoom_to(2.0);
    t.reset();
    assert_eq!(t, TransformState::default());
    assert_eq!(t.rotation_rad(), 0.0);
}

#[test]
fn reset_keeping_base_fit_only_clears_user_input() {
    let mut t = TransformState::default();
    t.set_base_fit(400.0, 300.0, 500.0, 500.0);
    t.pan_by(3.0, 4.0);
    t.zoom_to(2.0);
    t.reset_keeping_base_fit();
    assert_eq!(t.pan(), Vec2::ZERO);
    assert_eq!(t.scale(), 1.0);
    assert!(approx(t.base_fit_scale(), 1.25));
}

#[test]
fn photo_affine_centers_scaled_photo() {
    let mut t = TransformState::default();
    t.set_base_fit(400.0, 300.0, 500.0, 500.0);
    let photo = PixelSize {
        width: 400,
        height: 300,
    };
    let a = t.placement().photo_affine(photo, 500.0, 500.0);

    let top_left = a * Point::new(0.0, 0.0);
    let bottom_right = a * Point::new(400.0, 300.0);
    assert!(approx(top_left.x, 0.0) && approx(top_left.y, 62.5));
    assert!(approx(bottom_right.x, 500.0) && approx(bottom_right.y, 437.5));
}

#[test]
fn reprojection_scales_pan_only_by_ratio() {
    let mut t = TransformState::default();
    t.set_base_fit(400.0, 300.0, 500.0, 500.0);
    t.pan_by(10.0, -5.0);
    t.zoom_to(2.0);

    let p = t.reprojected(1.6, 2.0);
    assert_eq!(p.pan, Vec2::new(16.0, -8.0));
    assert!(approx(p.effective_scale, 4.0));
}

#[test]
fn deserialized_state_keeps_invariants() {
    let t: TransformState = serde_json::from_str(
        r#"{"pan":[3.0,-4.0],"scale":100.0,"base_fit_scale":1.5,"rotation_rad":1.0}"#,
    )
    .unwrap();
    assert_eq!(t.pan(), Vec2::new(3.0, -4.0));
    assert_eq!(t.scale(), MAX_SCALE);
    assert_eq!(t.base_fit_scale(), 1.5);
    assert_eq!(t.rotation_rad(), 0.0);

    let low: TransformState =
        serde_json::from_str(r#"{"pan":[0.0,0.0],"scale":0.01,"base_fit_scale":1.0}"#).unwrap();
    assert_eq!(low.scale(), MIN_SCALE);

    for bad in [
        r#"{"pan":[0.0,0.0],"scale":1.0,"base_fit_scale":-3.0}"#,
        r#"{"pan":[0.0,0.0],"scale":1.0,"base_fit_scale":0.0}"#,
    ] {
        assert!(serde_json::from_str::<TransformState>(bad).is_err(), "{bad}");
    }

    let round: TransformState =
        serde_json::from_str(&serde_json::to_string(&t).unwrap()).unwrap();
    assert_eq!(round, t);
}
