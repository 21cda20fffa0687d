//! Skeleton binding: canonical bones resolved against a live rig, plus the immutable
//! rest snapshot every pose offset is measured from.

use hashbrown::HashMap;

use crate::binding::{BoneHandle, HumanoidRig};
use crate::bones::BoneName;
use crate::error::BindError;
use crate::value::Euler;

/// Bones a rig must resolve to count as a humanoid binding.
pub const REQUIRED_BONES: [BoneName; 1] = [BoneName::Hips];

#[derive(Clone, Copy, Debug, PartialEq)]
struct RestTransform {
    rotation: Euler,
    scale: [f32; 3],
    position: [f32; 3],
}

/// A rig bound to the canonical bone set.
///
/// Rest transforms are captured once in [`Skeleton::bind`] and never change afterwards.
/// Bones the rig cannot resolve are simply absent; every accessor skips them.
#[derive(Debug)]
pub struct Skeleton<R> {
    rig: R,
    handles: HashMap<BoneName, BoneHandle>,
    rest: HashMap<BoneName, RestTransform>,
}

impl<R: HumanoidRig> Skeleton<R> {
    /// Resolve every canonical bone and snapshot its rest transform.
    pub fn bind(mut rig: R) -> Result<Self, BindError> {
        if !rig.is_humanoid() {
            return Err(BindError::NotHumanoid);
        }
        let mut handles = HashMap::new();
        let mut rest = HashMap::new();
        for bone in BoneName::ALL {
            if let Some(handle) = rig.resolve(bone) {
                handles.insert(bone, handle);
                rest.insert(
                    bone,
                    RestTransform {
                        rotation: rig.rotation(handle),
                        scale: rig.scale(handle),
                        position: rig.position(handle),
                    },
                );
            }
        }
        for bone in REQUIRED_BONES {
            if !handles.contains_key(&bone) {
                return Err(BindError::MissingRequiredBone(bone));
            }
        }
        Ok(Self { rig, handles, rest })
    }

    #[inline]
    pub fn is_bound(&self, bone: BoneName) -> bool {
        self.handles.contains_key(&bone)
    }

    /// Bound bones in canonical order.
    pub fn bones(&self) -> impl Iterator<Item = BoneName> + '_ {
        BoneName::ALL
            .into_iter()
            .filter(move |b| self.handles.contains_key(b))
    }

    pub fn bone_count(&self) -> usize {
        self.handles.len()
    }

    pub fn rest_rotation(&self, bone: BoneName) -> Option<Euler> {
        self.rest.get(&bone).map(|r| r.rotation)
    }

    /// Rest rotations of all bound bones.
    pub fn rest_rotations(&self) -> HashMap<BoneName, Euler> {
        self.rest.iter().map(|(b, r)| (*b, r.rotation)).collect()
    }

    pub fn rest_scale(&self, bone: BoneName) -> Option<[f32; 3]> {
        self.rest.get(&bone).map(|r| r.scale)
    }

    pub fn rest_position(&self, bone: BoneName) -> Option<[f32; 3]> {
        self.rest.get(&bone).map(|r| r.position)
    }

    /// Live rotation as the rig currently reports it.
    pub fn rotation(&self, bone: BoneName) -> Option<Euler> {
        self.handles.get(&bone).map(|h| self.rig.rotation(*h))
    }

    /// Write a rotation; returns false when the bone is not bound.
    pub fn set_rotation(&mut self, bone: BoneName, rotation: Euler) -> bool {
        match self.handles.get(&bone) {
            Some(h) => {
                self.rig.set_rotation(*h, rotation);
                true
            }
            None => false,
        }
    }

    pub fn set_scale(&mut self, bone: BoneName, scale: [f32; 3]) -> bool {
        match self.handles.get(&bone) {
            Some(h) => {
                self.rig.set_scale(*h, scale);
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, bone: BoneName, position: [f32; 3]) -> bool {
        match self.handles.get(&bone) {
            Some(h) => {
                self.rig.set_position(*h, position);
                true
            }
            None => false,
        }
    }

    /// Put a bone's scale back to its rest value.
    pub fn reset_scale(&mut self, bone: BoneName) {
        if let Some(scale) = self.rest_scale(bone) {
            self.set_scale(bone, scale);
        }
    }

    /// Put a bone's position back to its rest value.
    pub fn reset_position(&mut self, bone: BoneName) {
        if let Some(position) = self.rest_position(bone) {
            self.set_position(bone, position);
        }
    }

    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    pub fn into_rig(self) -> R {
        self.rig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::MemoryRig;

    #[test]
    fn bind_snapshots_rest_and_skips_missing_bones() {
        let mut rig = MemoryRig::new();
        rig.add_bone(BoneName::Hips, Euler::ZERO);
        rig.add_bone(BoneName::Head, Euler::new(0.1, 0.2, 0.3));
        let skel = Skeleton::bind(rig).unwrap();
        assert_eq!(skel.bone_count(), 2);
        assert_eq!(skel.rest_rotation(BoneName::Head), Some(Euler::new(0.1, 0.2, 0.3)));
        assert!(!skel.is_bound(BoneName::LeftHand));
        assert_eq!(
            skel.bones().collect::<Vec<_>>(),
            vec![BoneName::Hips, BoneName::Head]
        );
    }

    #[test]
    fn bind_rejects_rigs_without_humanoid_or_hips() {
        assert_eq!(
            Skeleton::bind(MemoryRig::not_humanoid()).unwrap_err(),
            BindError::NotHumanoid
        );
        let rig = MemoryRig::with_bones([BoneName::Head]);
        assert_eq!(
            Skeleton::bind(rig).unwrap_err(),
            BindError::MissingRequiredBone(BoneName::Hips)
        );
    }

    #[test]
    fn writes_to_unbound_bones_are_skipped() {
        let mut skel = Skeleton::bind(MemoryRig::with_bones([BoneName::Hips])).unwrap();
        assert!(!skel.set_rotation(BoneName::Head, Euler::new(1.0, 0.0, 0.0)));
        assert!(skel.set_rotation(BoneName::Hips, Euler::new(1.0, 0.0, 0.0)));
        assert_eq!(skel.rotation(BoneName::Hips), Some(Euler::new(1.0, 0.0, 0.0)));
        // Rest snapshot is unaffected by live writes.
        assert_eq!(skel.rest_rotation(BoneName::Hips), Some(Euler::ZERO));
    }
}
