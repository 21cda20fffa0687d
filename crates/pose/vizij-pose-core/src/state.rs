//! Activity state of the pose engine.
//!
//! Gesture and dance are mutually exclusive variants, so "dancing while gesturing" cannot
//! be represented. Blending is orthogonal and lives in the transition controller.

use serde::{Deserialize, Serialize};

/// Bookkeeping for a gesture in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureState {
    pub pose: String,
    pub elapsed: f32,
    pub end_time: f32,
    /// Pose to return to when the gesture ends; later requests overwrite it.
    pub return_pose: String,
    /// Pose held before the first gesture of a chain started. A gesture started from a
    /// deferred request returns here.
    pub origin: String,
}

impl GestureState {
    /// Normalized gesture time in [0,1].
    pub fn normalized(&self) -> f32 {
        if self.end_time <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.end_time).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.end_time
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DanceState {
    pub phase: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Activity {
    /// Holding or blending toward an ordinary pose.
    #[default]
    Posed,
    Gesture(GestureState),
    Dancing(DanceState),
}

impl Activity {
    pub fn gesture(&self) -> Option<&GestureState> {
        match self {
            Activity::Gesture(g) => Some(g),
            _ => None,
        }
    }

    pub fn is_dancing(&self) -> bool {
        matches!(self, Activity::Dancing(_))
    }
}

/// Coarse state reported to hosts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateKind {
    /// Resting at the target pose.
    Idle,
    Blending,
    Gesture,
    Dancing,
}
