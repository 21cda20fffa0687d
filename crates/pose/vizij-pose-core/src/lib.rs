//! Vizij Pose Core (engine-agnostic)
//!
//! Procedural skeletal animation for a humanoid avatar: named poses blended from the rig's
//! rest rotations, timed gestures with optional keyframes, a randomized idle-gesture
//! scheduler, micro-motion (head sway, hand drift, breathing) and a dance overlay.
//!
//! Hosts implement [`HumanoidRig`] over their bone graph, hand it to
//! [`PoseEngine::initialize`], and call [`PoseEngine::update`] once per frame.

pub mod avatar_state;
pub mod binding;
pub mod bones;
pub mod config;
pub mod dance;
pub mod engine;
pub mod error;
pub mod interp;
pub mod keyframes;
pub mod micro;
pub mod outputs;
pub mod pose;
pub mod scheduler;
pub mod skeleton;
pub mod state;
pub mod transition;
pub mod value;

// Re-exports for consumers (adapters)
pub use avatar_state::AvatarState;
pub use binding::{BoneHandle, BoneNode, HumanoidRig, MemoryRig};
pub use bones::BoneName;
pub use config::{DanceConfig, EngineConfig, IdleGestureConfig, MicroMotionConfig, Oscillator};
pub use engine::{PoseChangeCallback, PoseEngine};
pub use error::{BindError, PoseError};
pub use keyframes::{AxisOffsets, BoneSample, Keyframe, KeyframeSequence};
pub use outputs::{Outputs, PoseEvent};
pub use pose::{
    Pose, PoseLibrary, DANCING_POSE, IDLE_POSE, SITTING_POSE, SLEEPING_POSE,
};
pub use scheduler::IdleScheduler;
pub use skeleton::{Skeleton, REQUIRED_BONES};
pub use state::{Activity, DanceState, GestureState, StateKind};
pub use transition::Transition;
pub use value::{Axis, Euler};
