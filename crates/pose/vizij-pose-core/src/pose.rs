//! Named poses and the pose library.
//!
//! A pose is a set of per-bone rotation offsets relative to the rig's rest snapshot plus
//! blend metadata. Bones a pose leaves out keep whatever the engine currently holds.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::bones::BoneName;
use crate::error::PoseError;
use crate::keyframes::{AxisOffsets, Keyframe, KeyframeSequence};
use crate::value::Euler;

pub const IDLE_POSE: &str = "idle";
pub const SITTING_POSE: &str = "sitting";
pub const DANCING_POSE: &str = "dancing";
pub const SLEEPING_POSE: &str = "sleeping";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub name: String,
    /// Blend time into this pose, in seconds.
    #[serde(rename = "duration")]
    pub transition_duration: f32,
    #[serde(default, rename = "bones")]
    pub bone_offsets: HashMap<BoneName, Euler>,
    #[serde(default)]
    pub is_gesture: bool,
    #[serde(default)]
    pub return_to_idle: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gesture_duration: Option<f32>,
    #[serde(default, rename = "animation", skip_serializing_if = "Option::is_none")]
    pub keyframe_animation: Option<KeyframeSequence>,
}

impl Pose {
    pub fn new(name: &str, transition_duration: f32) -> Self {
        Self {
            name: name.to_string(),
            transition_duration,
            bone_offsets: HashMap::new(),
            is_gesture: false,
            return_to_idle: false,
            gesture_duration: None,
            keyframe_animation: None,
        }
    }

    pub fn bone(mut self, bone: BoneName, x: f32, y: f32, z: f32) -> Self {
        self.bone_offsets.insert(bone, Euler::new(x, y, z));
        self
    }

    /// Mark as a time-bounded gesture that returns to the pending pose when done.
    pub fn gesture(mut self, duration: f32) -> Self {
        self.is_gesture = true;
        self.return_to_idle = true;
        self.gesture_duration = Some(duration);
        self
    }

    pub fn keyframes(mut self, sequence: KeyframeSequence) -> Self {
        self.keyframe_animation = Some(sequence);
        self
    }

    pub fn offset(&self, bone: BoneName) -> Option<Euler> {
        self.bone_offsets.get(&bone).copied()
    }

    pub fn validate(&self) -> Result<(), PoseError> {
        if !self.transition_duration.is_finite() || self.transition_duration < 0.0 {
            return Err(PoseError::invalid(
                &self.name,
                "duration must be finite and >= 0",
            ));
        }
        if let Some(d) = self.gesture_duration {
            if !d.is_finite() || d <= 0.0 {
                return Err(PoseError::invalid(
                    &self.name,
                    "gestureDuration must be finite and > 0",
                ));
            }
        }
        if let Some((bone, _)) = self.bone_offsets.iter().find(|(_, o)| !o.is_finite()) {
            return Err(PoseError::invalid(
                &self.name,
                format!("offset for '{bone}' is not finite"),
            ));
        }
        if let Some(seq) = &self.keyframe_animation {
            seq.validate()
                .map_err(|reason| PoseError::invalid(&self.name, reason))?;
        }
        Ok(())
    }
}

/// Serialized form: poses as a list, each carrying its own name.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredPoseLibrary {
    poses: Vec<Pose>,
    #[serde(default)]
    idle_gestures: Vec<String>,
}

/// Pose table keyed by name, plus the gestures eligible for idle triggering.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseLibrary {
    poses: HashMap<String, Pose>,
    idle_gestures: Vec<String>,
}

impl Default for PoseLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PoseLibrary {
    pub fn empty() -> Self {
        Self {
            poses: HashMap::new(),
            idle_gestures: Vec::new(),
        }
    }

    /// Parse a pose library from JSON (`{ "poses": [...], "idleGestures": [...] }`)
    /// and validate it.
    pub fn from_json(s: &str) -> Result<Self, PoseError> {
        let stored: StoredPoseLibrary =
            serde_json::from_str(s).map_err(|e| PoseError::Parse(e.to_string()))?;
        let mut lib = Self::empty();
        for pose in stored.poses {
            if lib.poses.contains_key(&pose.name) {
                return Err(PoseError::invalid(&pose.name, "duplicate pose name"));
            }
            lib.insert(pose);
        }
        lib.idle_gestures = stored.idle_gestures;
        lib.validate()?;
        Ok(lib)
    }

    pub fn to_json(&self) -> Result<String, PoseError> {
        let mut poses: Vec<Pose> = self.poses.values().cloned().collect();
        poses.sort_by(|a, b| a.name.cmp(&b.name));
        let stored = StoredPoseLibrary {
            poses,
            idle_gestures: self.idle_gestures.clone(),
        };
        serde_json::to_string_pretty(&stored).map_err(|e| PoseError::Parse(e.to_string()))
    }

    /// Check every pose, the presence of `idle`, and that idle gestures name gesture poses.
    pub fn validate(&self) -> Result<(), PoseError> {
        if !self.poses.contains_key(IDLE_POSE) {
            return Err(PoseError::UnknownPose(IDLE_POSE.to_string()));
        }
        for pose in self.poses.values() {
            pose.validate()?;
        }
        for name in &self.idle_gestures {
            match self.poses.get(name) {
                Some(p) if p.is_gesture => {}
                Some(_) => {
                    return Err(PoseError::invalid(
                        name,
                        "idle gesture entries must be gesture poses",
                    ))
                }
                None => return Err(PoseError::UnknownPose(name.clone())),
            }
        }
        Ok(())
    }

    /// Insert or replace a pose by name.
    pub fn insert(&mut self, pose: Pose) {
        self.poses.insert(pose.name.clone(), pose);
    }

    pub fn set_idle_gestures(&mut self, names: Vec<String>) {
        self.idle_gestures = names;
    }

    pub fn get(&self, name: &str) -> Option<&Pose> {
        self.poses.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.poses.contains_key(name)
    }

    pub fn idle_gestures(&self) -> &[String] {
        &self.idle_gestures
    }

    /// Pose names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.poses.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// The companion avatar's stock pose table (offsets in radians).
    pub fn builtin() -> Self {
        use BoneName::*;

        let mut lib = Self::empty();

        // Relaxed stance: arms slightly away from the body, soft wrists.
        lib.insert(
            Pose::new(IDLE_POSE, 0.5)
                .bone(LeftUpperArm, 0.0, 0.0, 0.3)
                .bone(RightUpperArm, 0.0, 0.0, -0.3)
                .bone(LeftLowerArm, 0.0, 0.0, 0.0)
                .bone(RightLowerArm, 0.0, 0.0, 0.0)
                .bone(LeftHand, 0.0, 0.0, 0.1)
                .bone(RightHand, 0.0, 0.0, -0.1)
                .bone(LeftUpperLeg, 0.0, 0.0, 0.0)
                .bone(RightUpperLeg, 0.0, 0.0, 0.0)
                .bone(Spine, 0.0, 0.0, 0.0)
                .bone(Head, 0.0, 0.0, 0.0),
        );

        // Perched on a window edge or the taskbar, lower legs hanging.
        lib.insert(
            Pose::new(SITTING_POSE, 0.8)
                .bone(LeftUpperArm, 0.2, 0.0, 0.5)
                .bone(RightUpperArm, 0.2, 0.0, -0.5)
                .bone(LeftLowerArm, -0.8, 0.0, 0.0)
                .bone(RightLowerArm, -0.8, 0.0, 0.0)
                .bone(LeftUpperLeg, -1.57, 0.1, 0.0)
                .bone(RightUpperLeg, -1.57, -0.1, 0.0)
                .bone(LeftLowerLeg, 1.57, 0.0, 0.0)
                .bone(RightLowerLeg, 1.57, 0.0, 0.0)
                .bone(Spine, -0.1, 0.0, 0.0)
                .bone(Head, 0.05, 0.0, 0.0),
        );

        lib.insert(
            Pose::new("waving", 0.4)
                .gesture(2.0)
                .bone(RightUpperArm, 0.0, 0.0, -2.5)
                .bone(RightLowerArm, -0.8, 0.0, 0.0)
                .bone(RightHand, 0.0, 0.0, 0.0)
                .bone(Head, 0.0, 0.15, 0.05),
        );

        lib.insert(
            Pose::new("stretching", 0.6)
                .gesture(3.0)
                .bone(LeftUpperArm, 0.0, 0.3, 2.8)
                .bone(RightUpperArm, 0.0, -0.3, -2.8)
                .bone(LeftLowerArm, 0.0, 0.0, 0.0)
                .bone(RightLowerArm, 0.0, 0.0, 0.0)
                .bone(Spine, 0.15, 0.0, 0.0)
                .bone(Head, -0.2, 0.0, 0.0),
        );

        // Gentle head turns left and right on top of a slight neck turn.
        lib.insert(
            Pose::new("lookingAround", 0.4)
                .gesture(3.0)
                .bone(Head, 0.0, 0.15, 0.0)
                .bone(Neck, 0.0, 0.08, 0.0)
                .keyframes(KeyframeSequence::new(vec![
                    Keyframe::new(0.0).bone(Head, AxisOffsets::y(0.0)),
                    Keyframe::new(0.3).bone(Head, AxisOffsets::y(0.2)),
                    Keyframe::new(0.6).bone(Head, AxisOffsets::y(0.0)),
                    Keyframe::new(0.9).bone(Head, AxisOffsets::y(-0.2)),
                    Keyframe::new(1.0).bone(Head, AxisOffsets::y(0.0)),
                ])),
        );

        lib.insert(
            Pose::new(SLEEPING_POSE, 1.0)
                .bone(Head, 0.3, 0.1, 0.15)
                .bone(Neck, 0.1, 0.0, 0.0)
                .bone(Spine, 0.1, 0.0, 0.05)
                .bone(LeftUpperArm, 0.3, 0.0, 0.5)
                .bone(RightUpperArm, 0.3, 0.0, -0.5)
                .bone(LeftLowerArm, -0.4, 0.0, 0.0)
                .bone(RightLowerArm, -0.4, 0.0, 0.0),
        );

        // Base stance for the dance overlay.
        lib.insert(
            Pose::new(DANCING_POSE, 0.3)
                .bone(LeftUpperArm, 0.0, 0.3, 1.2)
                .bone(RightUpperArm, 0.0, -0.3, -1.2)
                .bone(LeftLowerArm, -1.0, 0.0, 0.0)
                .bone(RightLowerArm, -1.0, 0.0, 0.0)
                .bone(Spine, 0.0, 0.0, 0.0),
        );

        lib.insert(
            Pose::new("dragging", 0.2)
                .bone(LeftUpperArm, 0.0, 0.0, 0.8)
                .bone(RightUpperArm, 0.0, 0.0, -0.8)
                .bone(LeftLowerArm, -0.3, 0.0, 0.0)
                .bone(RightLowerArm, -0.3, 0.0, 0.0)
                .bone(LeftUpperLeg, 0.2, 0.0, 0.0)
                .bone(RightUpperLeg, 0.2, 0.0, 0.0),
        );

        // Hand to chin.
        lib.insert(
            Pose::new("thinking", 0.5)
                .bone(RightUpperArm, 0.8, 0.0, -1.2)
                .bone(RightLowerArm, -1.8, 0.0, 0.0)
                .bone(Head, 0.1, -0.1, 0.0)
                .bone(LeftUpperArm, 0.3, 0.0, 0.6)
                .bone(LeftLowerArm, -0.5, 0.0, 0.0),
        );

        lib.idle_gestures = vec![
            "waving".to_string(),
            "stretching".to_string(),
            "lookingAround".to_string(),
        ];
        lib
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_library_is_valid() {
        let lib = PoseLibrary::builtin();
        lib.validate().unwrap();
        assert_eq!(lib.len(), 9);
        for g in lib.idle_gestures() {
            assert!(lib.get(g).unwrap().is_gesture);
        }
        assert!(lib.get("lookingAround").unwrap().keyframe_animation.is_some());
    }

    #[test]
    fn json_round_trips_the_builtin_table() {
        let lib = PoseLibrary::builtin();
        let json = lib.to_json().unwrap();
        let back = PoseLibrary::from_json(&json).unwrap();
        assert_eq!(back, lib);
    }

    #[test]
    fn validate_rejects_negative_durations() {
        let pose = Pose::new("bad", -1.0);
        assert!(matches!(pose.validate(), Err(PoseError::Invalid { .. })));
    }
}
