use livemeasure::geometry::{signed_distance, to_display, to_native, DisplayPoint, NativePoint, SurfaceSize};

#[test]
fn maps_display_to_native_by_size_ratio() {
    // Surface rendered at half the native resolution in each axis.
    let surface = SurfaceSize::new(640.0, 480.0);
    let native = (1280, 960);
    let p = to_native(DisplayPoint::new(320.0, 120.0), surface, native);
    assert_eq!(p, NativePoint::new(640, 240));
}

#[test]
fn mapping_truncates_toward_zero() {
    let surface = SurfaceSize::new(300.0, 300.0);
    let native = (100, 100);
    // 299 * 100 / 300 = 99.666..; truncation, not rounding.
    let p = to_native(DisplayPoint::new(299.0, 1.0), surface, native);
    assert_eq!(p, NativePoint::new(99, 0));
}

#[test]
fn mapping_is_linear_within_truncation() {
    let surface = SurfaceSize::new(777.0, 333.0);
    let native = (1920, 1080);
    for k in 1..=4 {
        let base = to_native(DisplayPoint::new(100.0, 50.0), surface, native);
        let scaled = to_native(DisplayPoint::new(100.0 * k as f32, 50.0 * k as f32), surface, native);
        assert!((scaled.x - base.x * k).abs() <= k, "x not linear for k={k}");
        assert!((scaled.y - base.y * k).abs() <= k, "y not linear for k={k}");
    }
}

#[test]
fn to_display_inverts_to_native() {
    let surface = SurfaceSize::new(640.0, 480.0);
    let native = (1280, 960);
    let d = to_display(NativePoint::new(640, 240), surface, native);
    let back = to_native(d, surface, native);
    assert_eq!(back, NativePoint::new(640, 240));
}

#[test]
fn distance_of_identical_points_is_zero() {
    for p in [
        NativePoint::new(0, 0),
        NativePoint::new(17, -3),
        NativePoint::new(-100, 100),
    ] {
        assert_eq!(signed_distance(p, p), 0.0);
    }
}

#[test]
fn horizontal_dominant_left_to_right_is_positive() {
    // |dx| = 10 > |dy| = 3, left-to-right.
    let d = signed_distance(NativePoint::new(0, 0), NativePoint::new(10, 3));
    assert!((d - 109f64.sqrt()).abs() < 1e-9);
    assert!((d - 10.44).abs() < 0.01);
}

#[test]
fn horizontal_dominant_right_to_left_is_negative() {
    let d = signed_distance(NativePoint::new(10, 0), NativePoint::new(0, 0));
    assert!((d - (-10.0)).abs() < 1e-9);
}

#[test]
fn vertical_dominant_sign_follows_y_direction() {
    let down = signed_distance(NativePoint::new(0, 0), NativePoint::new(3, 10));
    let up = signed_distance(NativePoint::new(3, 10), NativePoint::new(0, 0));
    assert!(down > 0.0);
    assert!(up < 0.0);
    assert!((down + up).abs() < 1e-9);
}

#[test]
fn swapping_endpoints_flips_sign_and_keeps_magnitude() {
    let cases = [
        (NativePoint::new(2, 5), NativePoint::new(40, 11)),
        (NativePoint::new(-3, -8), NativePoint::new(1, 90)),
        (NativePoint::new(7, 7), NativePoint::new(6, 2)),
    ];
    for (p1, p2) in cases {
        let a = signed_distance(p1, p2);
        let b = signed_distance(p2, p1);
        assert!((a + b).abs() < 1e-9, "sign must flip for {p1:?} -> {p2:?}");
        assert!((a.abs() - b.abs()).abs() < 1e-9);
    }
}

#[test]
fn exact_diagonal_falls_into_vertical_branch() {
    // |dx| == |dy|: classified vertical-dominant by construction, so the
    // sign follows the y direction even though x also decreases.
    let d = signed_distance(NativePoint::new(10, 0), NativePoint::new(0, 10));
    assert!(d > 0.0, "top-to-bottom diagonal must be positive");
    let d = signed_distance(NativePoint::new(0, 10), NativePoint::new(10, 0));
    assert!(d < 0.0, "bottom-to-top diagonal must be negative");
}
