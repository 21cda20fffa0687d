//! Keyframed sub-animations played inside a gesture.
//!
//! Model:
//! - A sequence is an ordered list of keyframes with normalized times in [0,1] over the
//!   gesture's duration.
//! - Each keyframe names per-bone, per-axis offsets (relative to the rest rotation). Axes a
//!   keyframe leaves out are not driven by the sequence.
//! - Segment [Ki -> K(i+1)] progress is eased with the same cubic ease-in-out as pose blends.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::bones::BoneName;
use crate::interp::{ease_in_out_cubic, lerp_f32};
use crate::value::Axis;

/// Optional per-axis offsets for one bone.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AxisOffsets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl AxisOffsets {
    pub fn y(value: f32) -> Self {
        Self {
            y: Some(value),
            ..Self::default()
        }
    }

    #[inline]
    pub fn get(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    #[inline]
    pub fn set(&mut self, axis: Axis, value: Option<f32>) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

/// A single keyframe at normalized time `time`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    #[serde(default)]
    pub bones: HashMap<BoneName, AxisOffsets>,
}

impl Keyframe {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            bones: HashMap::new(),
        }
    }

    pub fn bone(mut self, bone: BoneName, offsets: AxisOffsets) -> Self {
        self.bones.insert(bone, offsets);
        self
    }
}

/// Interpolated offsets for one bone at a sampled time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneSample {
    pub bone: BoneName,
    pub offsets: AxisOffsets,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct KeyframeSequence {
    pub keyframes: Vec<Keyframe>,
}

impl KeyframeSequence {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self { keyframes }
    }

    /// Check stamps are finite, inside [0,1] and non-decreasing.
    pub fn validate(&self) -> Result<(), String> {
        if self.keyframes.is_empty() {
            return Err("keyframe sequence must not be empty".into());
        }
        let mut last = -f32::INFINITY;
        for k in &self.keyframes {
            if !k.time.is_finite() || k.time < 0.0 || k.time > 1.0 {
                return Err(format!("keyframe time {} must be in [0,1]", k.time));
            }
            if k.time < last {
                return Err("keyframe times must be non-decreasing".into());
            }
            last = k.time;
        }
        Ok(())
    }

    /// Sample the sequence at normalized gesture time `u`.
    ///
    /// Bones come from the left keyframe of the bracketing pair; an axis is produced only
    /// when both keyframes define it (a right keyframe without the bone holds the left value).
    pub fn sample(&self, u: f32) -> Vec<BoneSample> {
        let Some((i0, i1, local)) = find_segment(&self.keyframes, u) else {
            return Vec::new();
        };
        let left = &self.keyframes[i0];
        let right = &self.keyframes[i1];
        let eased = ease_in_out_cubic(local);

        let mut out = Vec::with_capacity(left.bones.len());
        for (bone, from) in &left.bones {
            let to = right.bones.get(bone).unwrap_or(from);
            let mut offsets = AxisOffsets::default();
            for axis in Axis::ALL {
                if let (Some(a), Some(b)) = (from.get(axis), to.get(axis)) {
                    offsets.set(axis, Some(lerp_f32(a, b, eased)));
                }
            }
            if !offsets.is_empty() {
                out.push(BoneSample {
                    bone: *bone,
                    offsets,
                });
            }
        }
        out.sort_by_key(|s| s.bone);
        out
    }
}

/// Find the keyframe pair [i, i+1] bracketing `u` and the local progress between them.
/// Before the first keyframe holds the first; at or past the last holds the last.
fn find_segment(keyframes: &[Keyframe], u: f32) -> Option<(usize, usize, f32)> {
    let n = keyframes.len();
    if n == 0 {
        return None;
    }
    let u = if u.is_finite() { u } else { 0.0 };
    if n == 1 || u <= keyframes[0].time {
        return Some((0, 0, 0.0));
    }
    if u >= keyframes[n - 1].time {
        return Some((n - 1, n - 1, 0.0));
    }
    for i in 0..(n - 1) {
        let t0 = keyframes[i].time;
        let t1 = keyframes[i + 1].time;
        if u >= t0 && u < t1 {
            let denom = (t1 - t0).max(f32::EPSILON);
            return Some((i, i + 1, ((u - t0) / denom).clamp(0.0, 1.0)));
        }
    }
    Some((n - 1, n - 1, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn look_sequence() -> KeyframeSequence {
        KeyframeSequence::new(vec![
            Keyframe::new(0.0).bone(BoneName::Head, AxisOffsets::y(0.0)),
            Keyframe::new(0.5).bone(BoneName::Head, AxisOffsets::y(1.0)),
            Keyframe::new(1.0).bone(BoneName::Head, AxisOffsets::y(0.0)),
        ])
    }

    fn head_y(samples: &[BoneSample]) -> f32 {
        samples
            .iter()
            .find(|s| s.bone == BoneName::Head)
            .and_then(|s| s.offsets.y)
            .unwrap()
    }

    #[test]
    fn samples_hit_keyframe_values() {
        let seq = look_sequence();
        assert_eq!(head_y(&seq.sample(0.0)), 0.0);
        assert_eq!(head_y(&seq.sample(0.5)), 1.0);
        assert_eq!(head_y(&seq.sample(1.0)), 0.0);
        assert_eq!(head_y(&seq.sample(2.0)), 0.0);
    }

    #[test]
    fn segment_progress_is_eased() {
        let seq = look_sequence();
        // Quarter time is the midpoint of the first segment: eased(0.5) == 0.5.
        assert!((head_y(&seq.sample(0.25)) - 0.5).abs() < 1e-5);
        // Early in the segment the ease-in lags behind linear.
        assert!(head_y(&seq.sample(0.1)) < 0.2);
    }

    #[test]
    fn only_axes_defined_on_both_sides_are_driven() {
        let seq = KeyframeSequence::new(vec![
            Keyframe::new(0.0).bone(
                BoneName::Head,
                AxisOffsets {
                    x: Some(0.2),
                    y: Some(0.0),
                    z: None,
                },
            ),
            Keyframe::new(1.0).bone(BoneName::Head, AxisOffsets::y(1.0)),
        ]);
        let s = seq.sample(0.5);
        assert_eq!(s.len(), 1);
        assert!(s[0].offsets.x.is_none());
        assert!(s[0].offsets.y.is_some());
    }

    #[test]
    fn validate_rejects_unordered_and_out_of_range_times() {
        assert!(look_sequence().validate().is_ok());
        let bad = KeyframeSequence::new(vec![Keyframe::new(0.6), Keyframe::new(0.3)]);
        assert!(bad.validate().is_err());
        let bad = KeyframeSequence::new(vec![Keyframe::new(1.5)]);
        assert!(bad.validate().is_err());
        assert!(KeyframeSequence::default().validate().is_err());
    }
}
