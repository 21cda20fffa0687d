//! Canonical humanoid bone identifiers.
//!
//! Names follow the VRM humanoid convention (`leftUpperArm`, `rightFoot`, ...) so that
//! rigs exported from common avatar tooling resolve without remapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PoseError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoneName {
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
}

impl BoneName {
    /// Every canonical bone, in binding order (root first).
    pub const ALL: [BoneName; 20] = [
        BoneName::Hips,
        BoneName::Spine,
        BoneName::Chest,
        BoneName::UpperChest,
        BoneName::Neck,
        BoneName::Head,
        BoneName::LeftShoulder,
        BoneName::LeftUpperArm,
        BoneName::LeftLowerArm,
        BoneName::LeftHand,
        BoneName::RightShoulder,
        BoneName::RightUpperArm,
        BoneName::RightLowerArm,
        BoneName::RightHand,
        BoneName::LeftUpperLeg,
        BoneName::LeftLowerLeg,
        BoneName::LeftFoot,
        BoneName::RightUpperLeg,
        BoneName::RightLowerLeg,
        BoneName::RightFoot,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            BoneName::Hips => "hips",
            BoneName::Spine => "spine",
            BoneName::Chest => "chest",
            BoneName::UpperChest => "upperChest",
            BoneName::Neck => "neck",
            BoneName::Head => "head",
            BoneName::LeftShoulder => "leftShoulder",
            BoneName::LeftUpperArm => "leftUpperArm",
            BoneName::LeftLowerArm => "leftLowerArm",
            BoneName::LeftHand => "leftHand",
            BoneName::RightShoulder => "rightShoulder",
            BoneName::RightUpperArm => "rightUpperArm",
            BoneName::RightLowerArm => "rightLowerArm",
            BoneName::RightHand => "rightHand",
            BoneName::LeftUpperLeg => "leftUpperLeg",
            BoneName::LeftLowerLeg => "leftLowerLeg",
            BoneName::LeftFoot => "leftFoot",
            BoneName::RightUpperLeg => "rightUpperLeg",
            BoneName::RightLowerLeg => "rightLowerLeg",
            BoneName::RightFoot => "rightFoot",
        }
    }
}

impl fmt::Display for BoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoneName {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoneName::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| PoseError::UnknownBone(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for bone in BoneName::ALL {
            assert_eq!(bone.as_str().parse::<BoneName>().unwrap(), bone);
        }
        assert!("tail".parse::<BoneName>().is_err());
    }

    #[test]
    fn serde_uses_camel_case_names() {
        let s = serde_json::to_string(&BoneName::LeftUpperArm).unwrap();
        assert_eq!(s, "\"leftUpperArm\"");
    }
}
