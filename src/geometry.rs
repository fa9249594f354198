//! Coordinate mapping and signed distance math.
//!
//! All measurement geometry happens in the *native* pixel space of the
//! acquired frame. Pointer events arrive in the coordinate space of the
//! rendered display surface (which is usually scaled to fit the window),
//! so they are rescaled to native coordinates before any distance is taken.

/// Rendered size of the display surface the operator interacts with, in
/// display pixels. Must have nonzero width and height before any mapping
/// is attempted; the UI only produces pointer events after layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A pointer position in display-surface coordinates. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

impl DisplayPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An integer pixel coordinate in the frame's native resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativePoint {
    pub x: i32,
    pub y: i32,
}

impl NativePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Map a display-surface point into native frame coordinates.
///
/// The mapping is a per-axis linear rescale by `native / surface`, computed
/// in real arithmetic and truncated toward zero.
///
/// Precondition: `surface` has nonzero width and height. The caller must
/// not map pointer positions before the surface has been laid out.
pub fn to_native(display: DisplayPoint, surface: SurfaceSize, native_size: (u32, u32)) -> NativePoint {
    debug_assert!(
        surface.width > 0.0 && surface.height > 0.0,
        "to_native called before the display surface was laid out"
    );
    let (nw, nh) = native_size;
    NativePoint {
        x: (display.x as f64 * nw as f64 / surface.width as f64) as i32,
        y: (display.y as f64 * nh as f64 / surface.height as f64) as i32,
    }
}

/// Map a native frame point back onto the display surface.
///
/// Inverse of [`to_native`] (up to truncation); used to paint the
/// in-progress measurement line over the rendered feed.
pub fn to_display(native: NativePoint, surface: SurfaceSize, native_size: (u32, u32)) -> DisplayPoint {
    debug_assert!(native_size.0 > 0 && native_size.1 > 0);
    DisplayPoint {
        x: (native.x as f64 * surface.width as f64 / native_size.0 as f64) as f32,
        y: (native.y as f64 * surface.height as f64 / native_size.1 as f64) as f32,
    }
}

/// Signed Euclidean distance between two native points.
///
/// The magnitude is always `sqrt(dx^2 + dy^2)`; only the sign encodes the
/// gesture direction, classified by the dominant axis:
///
/// * `|dx| > |dy|`, horizontal-dominant: negative iff the gesture ran
///   right-to-left (`p2.x < p1.x`).
/// * otherwise (vertical-dominant, including the exact diagonal
///   `|dx| == |dy|`): negative iff the gesture ran bottom-to-top
///   (`p2.y < p1.y`).
///
/// A zero-length gesture yields `0.0` with positive sign.
pub fn signed_distance(p1: NativePoint, p2: NativePoint) -> f64 {
    let dx = (p2.x - p1.x) as f64;
    let dy = (p2.y - p1.y) as f64;
    let distance = (dx * dx + dy * dy).sqrt();

    if dx.abs() > dy.abs() {
        if p2.x < p1.x {
            return -distance;
        }
    } else if p2.y < p1.y {
        return -distance;
    }
    distance
}
