//! Error types for pose-library loading and rig binding.

use thiserror::Error;

use crate::bones::BoneName;

/// Errors produced while building or querying a pose library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoseError {
    #[error("unknown pose: {0}")]
    UnknownPose(String),
    #[error("unknown bone: {0}")]
    UnknownBone(String),
    #[error("pose json parse error: {0}")]
    Parse(String),
    #[error("invalid pose '{pose}': {reason}")]
    Invalid { pose: String, reason: String },
}

impl PoseError {
    pub(crate) fn invalid(pose: &str, reason: impl Into<String>) -> Self {
        PoseError::Invalid {
            pose: pose.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors produced while binding a host rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("rig does not expose a humanoid binding")]
    NotHumanoid,
    #[error("rig is missing required bone '{0}'")]
    MissingRequiredBone(BoneName),
}
