//! Host-level avatar states and the pose each one drives.

use serde::{Deserialize, Serialize};

use crate::pose::{DANCING_POSE, IDLE_POSE, SITTING_POSE, SLEEPING_POSE};

/// Behavioral state reported by host subsystems (drag handling, idle detector, chat).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AvatarState {
    Idle,
    Dragging,
    Sitting,
    SittingWindow,
    SittingTaskbar,
    Dancing,
    Sleeping,
    Happy,
    Sad,
    Excited,
    Embarrassed,
    Thinking,
    Speaking,
}

impl AvatarState {
    /// Pose from the built-in library used for this state. Emotional and speaking states
    /// keep the idle stance; their expression is handled outside the skeleton.
    pub fn pose_name(&self) -> &'static str {
        match self {
            AvatarState::Dragging => "dragging",
            AvatarState::Sitting | AvatarState::SittingWindow | AvatarState::SittingTaskbar => {
                SITTING_POSE
            }
            AvatarState::Dancing => DANCING_POSE,
            AvatarState::Sleeping => SLEEPING_POSE,
            AvatarState::Thinking => "thinking",
            AvatarState::Idle
            | AvatarState::Happy
            | AvatarState::Sad
            | AvatarState::Excited
            | AvatarState::Embarrassed
            | AvatarState::Speaking => IDLE_POSE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PoseLibrary;

    #[test]
    fn every_state_maps_to_a_builtin_pose() {
        let lib = PoseLibrary::builtin();
        let states: Vec<AvatarState> = serde_json::from_str(
            r#"["idle","dragging","sitting","sittingWindow","sittingTaskbar","dancing",
                "sleeping","happy","sad","excited","embarrassed","thinking","speaking"]"#,
        )
        .unwrap();
        for s in states {
            assert!(lib.contains(s.pose_name()), "{s:?}");
        }
    }
}
