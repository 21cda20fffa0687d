//! Micro-motion overlay: small continuous perturbations as absolute functions of time.
//!
//! Every perturbation is `base + f(t)` where `base` is the pose-layer rotation; nothing is
//! ever accumulated onto a previous frame's perturbed value, so the overlay is bounded by
//! its amplitudes no matter how long it runs.

use crate::bones::BoneName;
use crate::config::MicroMotionConfig;
use crate::value::Euler;

/// Rotation offsets at time `t`, one per driven bone.
pub fn perturbations(cfg: &MicroMotionConfig, t: f32) -> [(BoneName, Euler); 3] {
    [
        (
            BoneName::Head,
            Euler::new(cfg.head_pitch.sample(t), cfg.head_yaw.sample(t), 0.0),
        ),
        (
            BoneName::LeftHand,
            Euler::new(cfg.left_hand.sample(t), 0.0, 0.0),
        ),
        (
            BoneName::RightHand,
            Euler::new(cfg.right_hand.sample(t), 0.0, 0.0),
        ),
    ]
}

/// Chest scale multipliers for breathing at time `t`; each axis stays within
/// `[1, 1 + amplitude]`.
pub fn breathing_scale(cfg: &MicroMotionConfig, t: f32) -> [f32; 3] {
    let b = &cfg.breathing;
    let unit = (t * b.frequency + b.phase).sin() * 0.5 + 0.5;
    let amount = unit * b.amplitude;
    [
        1.0 + amount,
        1.0 + amount * cfg.breathing_vertical_weight,
        1.0 + amount,
    ]
}

/// Largest offset any perturbation can produce on `bone`.
pub fn amplitude_bound(cfg: &MicroMotionConfig, bone: BoneName) -> f32 {
    match bone {
        BoneName::Head => cfg.head_pitch.amplitude.abs().max(cfg.head_yaw.amplitude.abs()),
        BoneName::LeftHand => cfg.left_hand.amplitude.abs(),
        BoneName::RightHand => cfg.right_hand.amplitude.abs(),
        _ => 0.0,
    }
}
