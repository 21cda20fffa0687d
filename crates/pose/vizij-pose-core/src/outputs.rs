//! Semantic events emitted by the pose engine.
//!
//! Events are queued as they happen (from trigger calls or during `update`) and drained by
//! the host, e.g. to drive a status line or forward to another window.

use serde::{Deserialize, Serialize};

/// Discrete signals emitted by trigger calls and ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum PoseEvent {
    PoseChanged {
        from: String,
        to: String,
    },
    GestureStarted {
        gesture: String,
        #[serde(rename = "returnPose")]
        return_pose: String,
    },
    GestureEnded {
        gesture: String,
    },
    /// A pose request named no known pose and was ignored.
    UnknownPose {
        name: String,
    },
}

/// Event queue owned by the engine.
#[derive(Clone, Debug, Default)]
pub struct Outputs {
    events: Vec<PoseEvent>,
}

impl Outputs {
    #[inline]
    pub fn push_event(&mut self, event: PoseEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn events(&self) -> &[PoseEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<PoseEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
