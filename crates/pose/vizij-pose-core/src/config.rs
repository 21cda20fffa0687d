//! Engine configuration for vizij-pose-core.

use serde::{Deserialize, Serialize};

use crate::error::PoseError;
use crate::pose::{DANCING_POSE, SLEEPING_POSE};

/// Tunables for the pose engine. Every field has a default, so partial JSON is accepted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub idle_gestures: IdleGestureConfig,
    pub micro_motion: MicroMotionConfig,
    pub dance: DanceConfig,
    /// Gesture length used when a gesture pose does not declare one (seconds).
    pub default_gesture_duration: f32,
    /// Seed for the idle scheduler's RNG; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idle_gestures: IdleGestureConfig::default(),
            micro_motion: MicroMotionConfig::default(),
            dance: DanceConfig::default(),
            default_gesture_duration: 2.0,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(s: &str) -> Result<Self, PoseError> {
        serde_json::from_str(s).map_err(|e| PoseError::Parse(e.to_string()))
    }

    /// Same config with a fixed scheduler seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Random idle-gesture scheduling.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IdleGestureConfig {
    pub enabled: bool,
    /// Threshold range the scheduler draws from, in seconds.
    pub min_delay: f32,
    pub max_delay: f32,
    /// Chance that a threshold crossing actually starts a gesture.
    pub probability: f64,
}

impl Default for IdleGestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_delay: 10.0,
            max_delay: 30.0,
            probability: 0.3,
        }
    }
}

/// `amplitude * sin(frequency * t + phase)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Oscillator {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self {
            amplitude: 0.0,
            frequency: 1.0,
            phase: 0.0,
        }
    }
}

impl Oscillator {
    pub const fn new(amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
        }
    }

    #[inline]
    pub fn sample(&self, t: f32) -> f32 {
        (t * self.frequency + self.phase).sin() * self.amplitude
    }
}

/// Continuous micro-motion layered over the committed pose.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MicroMotionConfig {
    pub enabled: bool,
    pub head_pitch: Oscillator,
    pub head_yaw: Oscillator,
    pub left_hand: Oscillator,
    pub right_hand: Oscillator,
    /// Chest expansion; the sinusoid is remapped to [0, amplitude].
    pub breathing: Oscillator,
    /// Weight of the breathing scale on the vertical axis.
    pub breathing_vertical_weight: f32,
    /// Poses during which micro-motion is suspended.
    pub excluded_poses: Vec<String>,
}

impl Default for MicroMotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            head_pitch: Oscillator::new(0.008, 0.3, 0.0),
            head_yaw: Oscillator::new(0.005, 0.2, 0.0),
            left_hand: Oscillator::new(0.01, 0.4, 0.5),
            right_hand: Oscillator::new(0.01, 0.35, 0.0),
            breathing: Oscillator::new(0.003, 0.8, 0.0),
            breathing_vertical_weight: 0.5,
            excluded_poses: vec![SLEEPING_POSE.to_string(), DANCING_POSE.to_string()],
        }
    }
}

/// Phase-driven dance overlay.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DanceConfig {
    /// Phase advance per second.
    pub frequency: f32,
    pub bounce_amplitude: f32,
    pub arm_swing_amplitude: f32,
    /// Intensity before the host sets one, in [0,1].
    pub initial_intensity: f32,
}

impl Default for DanceConfig {
    fn default() -> Self {
        Self {
            frequency: 4.0,
            bounce_amplitude: 0.1,
            arm_swing_amplitude: 0.3,
            initial_intensity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{ "seed": 7, "dance": { "frequency": 2.0 } }"#)
            .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.dance.frequency, 2.0);
        assert_eq!(cfg.dance.bounce_amplitude, 0.1);
        assert_eq!(cfg.idle_gestures, IdleGestureConfig::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_json("{ nope"),
            Err(PoseError::Parse(_))
        ));
    }
}
