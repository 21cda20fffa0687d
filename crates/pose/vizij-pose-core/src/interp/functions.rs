//! Interpolation helpers:
//! - lerp_f32 / lerp_euler (component-wise)
//! - ease_in_out_cubic (symmetric cubic timing curve)

use crate::value::Euler;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise linear interpolation of Euler rotations.
#[inline]
pub fn lerp_euler(a: Euler, b: Euler, t: f32) -> Euler {
    Euler::new(
        lerp_f32(a.x, b.x, t),
        lerp_f32(a.y, b.y, t),
        lerp_f32(a.z, b.z, t),
    )
}

/// Cubic ease-in-out on `t` clamped into [0, 1].
///
/// Accelerates over the first half and decelerates symmetrically over the second;
/// exactly 0 at 0, 0.5 at 0.5 and 1 at 1.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}
