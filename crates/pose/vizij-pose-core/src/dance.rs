//! Dance overlay: phase-driven hip bounce and mirrored upper-arm swing.

use crate::config::DanceConfig;
use crate::state::DanceState;

/// Clamp a host-supplied intensity into [0,1]; NaN counts as 0.
pub fn clamp_intensity(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl DanceState {
    pub fn advance(&mut self, dt: f32, cfg: &DanceConfig) {
        self.phase += dt.max(0.0) * cfg.frequency;
        // Keep the accumulator small; both curves repeat every pi.
        if self.phase > 1000.0 * std::f32::consts::PI {
            self.phase = self.phase.rem_euclid(std::f32::consts::PI);
        }
    }

    /// Vertical hip offset, in [0, bounce_amplitude * intensity].
    pub fn bounce(&self, cfg: &DanceConfig, intensity: f32) -> f32 {
        self.phase.sin().abs() * cfg.bounce_amplitude * intensity
    }

    /// Upper-arm swing around z; the left arm adds it, the right arm subtracts it.
    pub fn arm_swing(&self, cfg: &DanceConfig, intensity: f32) -> f32 {
        (self.phase * 2.0).sin() * cfg.arm_swing_amplitude * intensity
    }
}
