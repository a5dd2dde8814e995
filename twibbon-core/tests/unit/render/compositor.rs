use super::*;
use crate::foundation::core::Vec2;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Bitmap {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        data.extend_from_slice(&rgba);
    }
    Bitmap {
        width: w,
        height: h,
        rgba8_premul: Arc::new(data),
    }
}

/// 4x4 frame: opaque blue ring around a transparent 2x2 window.
fn window_frame() -> Bitmap {
    let mut data = Vec::new();
    for y in 0..4 {
        for x in 0..4 {
            let inner = (1..3).contains(&x) && (1..3).contains(&y);
            data.extend_from_slice(if inner { &CLEAR } else { &BLUE });
        }
    }
    Bitmap {
        width: 4,
        height: 4,
        rgba8_premul: Arc::new(data),
    }
}

fn assert_px_near(surface: &Surface, x: u32, y: u32, expected: [u8; 4]) {
    let px = surface.pixel(x, y).unwrap();
    for c in 0..4 {
        let d = (i16::from(px[c]) - i16::from(expected[c])).abs();
        assert!(d <= 2, "pixel ({x},{y}) = {px:?}, expected ~{expected:?}");
    }
}

fn fitted(user: &Bitmap, w: u32, h: u32) -> TransformState {
    let mut t = TransformState::default();
    assert!(t.set_base_fit(
        f64::from(user.width),
        f64::from(user.height),
        f64::from(w),
        f64::from(h)
    ));
    t
}

#[test]
fn photo_is_centered_and_fitted() {
    let user = solid(40, 30, RED);
    let frame = solid(2, 2, CLEAR);
    let t = fitted(&user, 100, 100);
    let mut surface = Surface::new(100, 100).unwrap();

    let out = Compositor::new()
        .render(&mut surface, Some(&user), Some(&frame), &t)
        .unwrap();
    assert_eq!(out, RenderOutcome::Drawn);

    // 40x30 * 2.5 = 100x75, rows 12.5..87.5
    assert_px_near(&surface, 50, 50, RED);
    assert_px_near(&surface, 2, 20, RED);
    assert_px_near(&surface, 50, 5, CLEAR);
    assert_px_near(&surface, 50, 95, CLEAR);
}

#[test]
fn pan_moves_photo_center() {
    let user = solid(40, 30, RED);
    let frame = solid(2, 2, CLEAR);
    let mut t = fitted(&user, 100, 100);
    t.pan_by(0.0, 40.0);
    let mut surface = Surface::new(100, 100).unwrap();

    Compositor::new()
        .render(&mut surface, Some(&user), Some(&frame), &t)
        .unwrap();
    // rows 52.5..127.5
    assert_px_near(&surface, 50, 30, CLEAR);
    assert_px_near(&surface, 50, 70, RED);
    assert_px_near(&surface, 50, 99, RED);
}

#[test]
fn zoom_grows_photo_around_center() {
    let user = solid(40, 30, RED);
    let frame = solid(2, 2, CLEAR);
    let mut t = fitted(&user, 100, 100);
    t.zoom_to(0.5);
    let mut surface = Surface::new(100, 100).unwrap();

    Compositor::new()
        .render(&mut surface, Some(&user), Some(&frame), &t)
        .unwrap();
    // 50x37.5 centered: cols 25..75, rows 31.25..68.75
    assert_px_near(&surface, 50, 50, RED);
    assert_px_near(&surface, 10, 50, CLEAR);
    assert_px_near(&surface, 50, 20, CLEAR);
}

#[test]
fn frame_is_stretched_on_top() {
    let user = solid(40, 30, RED);
    let mut t = fitted(&user, 100, 100);
    t.zoom_to(5.0);
    let mut surface = Surface::new(100, 100).unwrap();

    Compositor::new()
        .render(&mut surface, Some(&user), Some(&window_frame()), &t)
        .unwrap();
    assert_px_near(&surface, 5, 5, BLUE);
    assert_px_near(&surface, 95, 50, BLUE);
    assert_px_near(&surface, 50, 50, RED);
}

#[test]
fn opaque_frame_hides_photo_regardless_of_transform() {
    let user = solid(40, 30, RED);
    let frame = solid(3, 5, BLUE);
    let mut t = fitted(&user, 64, 48);
    t.pan_by(7.0, -3.0);
    t.zoom_to(3.0);
    let mut surface = Surface::new(64, 48).unwrap();

    Compositor::new()
        .render(&mut surface, Some(&user), Some(&frame), &t)
        .unwrap();
    for (x, y) in [(0, 0), (63, 47), (32, 24), (10, 40)] {
        assert_px_near(&surface, x, y, BLUE);
    }
}

#[test]
fn render_is_idempotent() {
    let user = solid(40, 30, RED);
    let frame = window_frame();
    let mut t = fitted(&user, 80, 60);
    t.pan_by(3.5, -7.25);
    t.zoom_to(1.7);

    let mut compositor = Compositor::new();
    let mut surface = Surface::new(80, 60).unwrap();
    compositor
        .render(&mut surface, Some(&user), Some(&frame), &t)
        .unwrap();
    let first = surface.data().to_vec();
    compositor
        .render(&mut surface, Some(&user), Some(&frame), &t)
        .unwrap();
    assert_eq!(first, surface.data());

    let mut other = Surface::new(80, 60).unwrap();
    Compositor::new()
        .render(&mut other, Some(&user), Some(&frame), &t)
        .unwrap();
    assert_eq!(first, other.data());
}

#[test]
fn missing_bitmap_is_a_noop() {
    let user = solid(4, 4, RED);
    let frame = solid(4, 4, BLUE);
    let t = fitted(&user, 10, 10);
    let mut surface = Surface::new(10, 10).unwrap();
    let mut compositor = Compositor::new();

    compositor
        .render(&mut surface, Some(&user), Some(&frame), &t)
        .unwrap();
    let before = surface.data().to_vec();

    assert_eq!(
        compositor.render(&mut surface, None, Some(&frame), &t).unwrap(),
        RenderOutcome::Skipped
    );
    assert_eq!(
        compositor.render(&mut surface, Some(&user), None, &t).unwrap(),
        RenderOutcome::Skipped
    );
    assert_eq!(before, surface.data());
}

#[test]
fn replaced_bitmap_is_not_served_from_cache() {
    let frame = solid(2, 2, CLEAR);
    let red = solid(8, 8, RED);
    let blue = solid(8, 8, BLUE);
    let t = fitted(&red, 16, 16);
    let mut surface = Surface::new(16, 16).unwrap();
    let mut compositor = Compositor::new();

    compositor
        .render(&mut surface, Some(&red), Some(&frame), &t)
        .unwrap();
    assert_px_near(&surface, 8, 8, RED);
    compositor
        .render(&mut surface, Some(&blue), Some(&frame), &t)
        .unwrap();
    assert_px_near(&surface, 8, 8, BLUE);
}

#[test]
fn explicit_placement_matches_transform_render() {
    let user = solid(40, 30, RED);
    let frame = window_frame();
    let mut t = fitted(&user, 50, 50);
    t.pan_by(-4.0, 6.0);

    let mut a = Surface::new(50, 50).unwrap();
    let mut b = Surface::new(50, 50).unwrap();
    let mut compositor = Compositor::new();
    compositor
        .render(&mut a, Some(&user), Some(&frame), &t)
        .unwrap();
    compositor
        .render_placement(
            &mut b,
            Some(&user),
            Some(&frame),
            Placement {
                pan: Vec2::new(-4.0, 6.0),
                effective_scale: t.effective_scale(),
            },
        )
        .unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn zero_area_surface_cannot_exist() {
    assert!(matches!(
        Surface::new(0, 10),
        Err(TwibbonError::InvalidViewport(_))
    ));
    assert!(matches!(
        Surface::new(10, 70_000),
        Err(TwibbonError::InvalidViewport(_))
    ));
}

#[test]
fn zero_sized_bitmap_is_skipped() {
    let user = solid(4, 4, RED);
    let empty = Bitmap {
        width: 0,
        height: 0,
        rgba8_premul: Arc::new(Vec::new()),
    };
    let mut surface = Surface::new(10, 10).unwrap();
    let mut compositor = Compositor::new();
    let t = TransformState::default();

    let outcome = compositor
        .render(&mut surface, Some(&user), Some(&empty), &t)
        .unwrap();
    assert_eq!(outcome, RenderOutcome::Skipped);
    assert_eq!(surface.pixel(5, 5), Some(CLEAR));

    let outcome = compositor
        .render(&mut surface, Some(&empty), Some(&window_frame()), &t)
        .unwrap();
    assert_eq!(outcome, RenderOutcome::Skipped);
    assert!(surface.data().iter().all(|b| *b == 0));
}
