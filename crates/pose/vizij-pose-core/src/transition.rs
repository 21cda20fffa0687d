//! Transition controller: eased blends between absolute bone rotations.
//!
//! Three rotation maps are tracked per bound bone:
//! - `current`: origin of the running blend (committed when the previous blend started)
//! - `target`: rest + pose offset, or the origin for bones the pose leaves out
//! - `applied`: the pose-layer rotation produced this tick (what overlays sit on top of)
//!
//! A new blend always starts from `applied`, so retargeting mid-blend re-aims smoothly
//! instead of snapping back. None of these maps is ever read back from the rig.

use hashbrown::HashMap;

use crate::bones::BoneName;
use crate::interp::{ease_in_out_cubic, lerp_euler};
use crate::pose::Pose;
use crate::value::{Axis, Euler};

#[derive(Clone, Debug)]
pub struct Transition {
    current: HashMap<BoneName, Euler>,
    target: HashMap<BoneName, Euler>,
    applied: HashMap<BoneName, Euler>,
    progress: f32,
    duration: f32,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            current: HashMap::new(),
            target: HashMap::new(),
            applied: HashMap::new(),
            progress: 1.0,
            duration: 0.0,
        }
    }
}

impl Transition {
    /// Controller resting at the given rotations.
    pub fn at_rest(rest: &HashMap<BoneName, Euler>) -> Self {
        Self {
            current: rest.clone(),
            target: rest.clone(),
            applied: rest.clone(),
            progress: 1.0,
            duration: 0.0,
        }
    }

    /// Absolute targets for `pose`: rest + offset where the pose defines a bone, the present
    /// pose-layer rotation otherwise. Only bones present in `rest` are produced.
    pub fn targets_for(
        &self,
        rest: &HashMap<BoneName, Euler>,
        pose: &Pose,
    ) -> HashMap<BoneName, Euler> {
        rest.iter()
            .map(|(bone, base)| {
                let rot = match pose.offset(*bone) {
                    Some(offset) => *base + offset,
                    None => self.applied.get(bone).copied().unwrap_or(*base),
                };
                (*bone, rot)
            })
            .collect()
    }

    /// Start blending from the present rotations toward `targets` over `duration` seconds.
    pub fn begin(&mut self, targets: HashMap<BoneName, Euler>, duration: f32) {
        self.current = self.applied.clone();
        self.target = targets;
        self.duration = duration.max(0.0);
        self.progress = 0.0;
    }

    /// Apply `targets` at once and commit them.
    pub fn jump(&mut self, targets: HashMap<BoneName, Euler>) {
        self.applied = targets.clone();
        self.current = targets.clone();
        self.target = targets;
        self.progress = 1.0;
    }

    /// Advance the blend by `dt`. Returns true when `applied` changed this tick.
    ///
    /// On completion `applied` is set to the exact targets and committed as the new origin.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.is_blending() {
            return false;
        }
        if self.duration <= f32::EPSILON {
            self.progress = 1.0;
        } else {
            self.progress = (self.progress + dt.max(0.0) / self.duration).min(1.0);
        }

        if self.progress >= 1.0 {
            self.applied = self.target.clone();
            self.current = self.target.clone();
            return true;
        }

        let eased = ease_in_out_cubic(self.progress);
        for (bone, from) in &self.current {
            let to = self.target.get(bone).copied().unwrap_or(*from);
            self.applied.insert(*bone, lerp_euler(*from, to, eased));
        }
        true
    }

    /// Override one axis of the present rotation (used by keyframed gestures).
    pub fn override_axis(&mut self, bone: BoneName, axis: Axis, value: f32) {
        if let Some(rot) = self.applied.get_mut(&bone) {
            rot.set_axis(axis, value);
        }
    }

    #[inline]
    pub fn is_blending(&self) -> bool {
        self.progress < 1.0
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Pose-layer rotation of `bone` as of the last tick.
    pub fn rotation(&self, bone: BoneName) -> Option<Euler> {
        self.applied.get(&bone).copied()
    }

    pub fn applied(&self) -> &HashMap<BoneName, Euler> {
        &self.applied
    }

    pub fn current(&self) -> &HashMap<BoneName, Euler> {
        &self.current
    }

    pub fn target(&self) -> &HashMap<BoneName, Euler> {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest() -> HashMap<BoneName, Euler> {
        let mut m = HashMap::new();
        m.insert(BoneName::Head, Euler::ZERO);
        m.insert(BoneName::LeftUpperArm, Euler::new(0.0, 0.0, 0.1));
        m
    }

    #[test]
    fn blend_reaches_targets_exactly_and_stops() {
        let rest = rest();
        let mut tr = Transition::at_rest(&rest);
        let pose = Pose::new("p", 1.0).bone(BoneName::LeftUpperArm, 0.0, 0.0, 1.0);
        let targets = tr.targets_for(&rest, &pose);
        tr.begin(targets, 1.0);
        assert!(tr.advance(0.5));
        let mid = tr.rotation(BoneName::LeftUpperArm).unwrap();
        assert!(mid.z > 0.1 && mid.z < 1.1);
        assert!(tr.advance(0.6));
        let end = tr.rotation(BoneName::LeftUpperArm).unwrap();
        assert!(end.max_abs_diff(&Euler::new(0.0, 0.0, 1.1)) < 1e-6);
        assert!(!tr.advance(0.5));
        assert_eq!(tr.current()[&BoneName::LeftUpperArm], end);
    }

    #[test]
    fn zero_duration_completes_on_next_tick() {
        let rest = rest();
        let mut tr = Transition::at_rest(&rest);
        let pose = Pose::new("p", 0.0).bone(BoneName::Head, 0.5, 0.0, 0.0);
        tr.begin(tr.targets_for(&rest, &pose), 0.0);
        tr.advance(0.0);
        assert!(!tr.is_blending());
        assert_eq!(tr.rotation(BoneName::Head), Some(Euler::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn retarget_starts_from_present_rotation() {
        let rest = rest();
        let mut tr = Transition::at_rest(&rest);
        let up = Pose::new("up", 1.0).bone(BoneName::Head, 1.0, 0.0, 0.0);
        tr.begin(tr.targets_for(&rest, &up), 1.0);
        tr.advance(0.5);
        let visual = tr.rotation(BoneName::Head).unwrap();

        let down = Pose::new("down", 1.0).bone(BoneName::Head, -1.0, 0.0, 0.0);
        tr.begin(tr.targets_for(&rest, &down), 1.0);
        assert_eq!(tr.current()[&BoneName::Head], visual);
        tr.advance(0.01);
        let next = tr.rotation(BoneName::Head).unwrap();
        assert!(next.max_abs_diff(&visual) < 0.01);
    }

    #[test]
    fn bones_outside_the_pose_hold_present_value() {
        let rest = rest();
        let mut tr = Transition::at_rest(&rest);
        tr.override_axis(BoneName::Head, Axis::Y, 0.3);
        let pose = Pose::new("arm", 1.0).bone(BoneName::LeftUpperArm, 0.0, 0.0, 0.2);
        let targets = tr.targets_for(&rest, &pose);
        assert_eq!(targets[&BoneName::Head], Euler::new(0.0, 0.3, 0.0));
    }
}
