//! Interpolation and easing helpers shared by pose blends and keyframe sequences.
//!
//! Blends ease time with a cubic ease-in-out and then lerp each Euler component.

pub mod functions;

pub use functions::{ease_in_out_cubic, lerp_euler, lerp_f32};
