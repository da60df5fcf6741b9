//! Joint angle geometry.
//!
//! All angles are returned in degrees as `f32`. Intermediate arithmetic is
//! carried in `f64` so that near-colinear configurations stay stable.
//!
//! A zero-length ray has no direction, so the angle at such a vertex is
//! undefined: these functions return `f32::NAN` instead of failing, and
//! callers treat NaN as "cannot verify".

use crate::types::Point2;

/// Angle at vertex `b` between the rays `b→a` and `b→c`, in `[0, 180]`.
///
/// Returns NaN when either ray has zero length or any coordinate is
/// non-finite.
///
/// ```rust
/// use fitpose_core::{geometry::angle_at, Point2};
///
/// let right = angle_at(Point2::new(1.0, 0.0), Point2::new(0.0, 0.0), Point2::new(0.0, 1.0));
/// assert!((right - 90.0).abs() < 1e-4);
/// assert!(angle_at(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).is_nan());
/// ```
#[must_use]
pub fn angle_at(a: Point2, b: Point2, c: Point2) -> f32 {
    let (bax, bay) = (f64::from(a.x) - f64::from(b.x), f64::from(a.y) - f64::from(b.y));
    let (bcx, bcy) = (f64::from(c.x) - f64::from(b.x), f64::from(c.y) - f64::from(b.y));

    let norm_ba = bax.hypot(bay);
    let norm_bc = bcx.hypot(bcy);
    if !(norm_ba.is_finite() && norm_bc.is_finite()) || norm_ba == 0.0 || norm_bc == 0.0 {
        return f32::NAN;
    }

    // Rounding can push the ratio just past ±1 for colinear rays.
    let cosine = ((bax * bcx + bay * bcy) / (norm_ba * norm_bc)).clamp(-1.0, 1.0);
    cosine.acos().to_degrees() as f32
}

/// Angle at `b` measured on the underside of the `a`–`c` line, in `[0, 360)`.
///
/// When `b` sits below the line through `a` and `c` (larger `y` in image
/// coordinates) this equals [`angle_at`]; when `b` sits above it, the
/// reflex angle `360 - angle_at` is returned. A straight line reads 180, so
/// a sagging joint reads under 180 and a raised one over 180.
///
/// If `a` and `c` share an x coordinate there is no "below", and the plain
/// [`angle_at`] value is returned.
#[must_use]
pub fn underside_angle_at(a: Point2, b: Point2, c: Point2) -> f32 {
    let angle = angle_at(a, b, c);
    if angle.is_nan() {
        return angle;
    }

    let (dx, dy) = (f64::from(c.x) - f64::from(a.x), f64::from(c.y) - f64::from(a.y));
    let (hx, hy) = (f64::from(b.x) - f64::from(a.x), f64::from(b.y) - f64::from(a.y));
    let cross = dx * hy - dy * hx;

    if dx == 0.0 || cross * dx.signum() >= 0.0 {
        angle
    } else {
        360.0 - angle
    }
}

/// Absolute deviation of `angle` from a straight line (180°).
#[must_use]
pub fn deviation_from_straight(angle: f32) -> f32 {
    (180.0 - angle).abs()
}
