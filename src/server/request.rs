//! Single-shot gain request.

use crate::core::{LabeledPointCloud, POSE_STRIDE, Pose6D};
use crate::error::{GainError, Result};

/// A labeled cloud plus flattened candidate poses.
#[derive(Clone, Debug, Default)]
pub struct InfoGainRequest {
    /// Cloud in the sensor frame, labeled with interestingness.
    pub cloud: LabeledPointCloud,
    /// `[x, y, z, roll, pitch, yaw]` per candidate, concatenated.
    pub camera_poses: Vec<f32>,
    /// Pose the cloud was captured from.
    pub sensor_pose: Pose6D,
}

impl InfoGainRequest {
    /// Create a request with the cloud at the identity pose.
    pub fn new(cloud: LabeledPointCloud, camera_poses: Vec<f32>) -> Self {
        Self {
            cloud,
            camera_poses,
            sensor_pose: Pose6D::identity(),
        }
    }

    /// Number of candidate poses (rounded down).
    pub fn num_poses(&self) -> usize {
        self.camera_poses.len() / POSE_STRIDE
    }

    /// Check the request and decode its candidate poses.
    pub fn validate(&self) -> Result<Vec<Pose6D>> {
        let poses = Pose6D::parse_many(&self.camera_poses).ok_or(GainError::MalformedPoses {
            len: self.camera_poses.len(),
        })?;
        self.cloud.validate()?;
        Ok(poses)
    }
}
