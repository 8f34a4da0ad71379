//! 6-DOF pose for candidate viewpoints.
//!
//! Coordinate frame follows ROS REP-103 (X forward, Y left, Z up). Euler
//! angles compose as `Rz(yaw) * Ry(pitch) * Rx(roll)`.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Number of scalars in a flattened pose.
pub const POSE_STRIDE: usize = 6;

/// Position plus roll/pitch/yaw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose6D {
    /// X position in meters.
    pub x: f32,
    /// Y position in meters.
    pub y: f32,
    /// Z position in meters.
    pub z: f32,
    /// Rotation about X in radians.
    pub roll: f32,
    /// Rotation about Y in radians.
    pub pitch: f32,
    /// Rotation about Z in radians.
    pub yaw: f32,
}

impl Pose6D {
    /// Create a new pose.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, roll: f32, pitch: f32, yaw: f32) -> Self {
        Self {
            x,
            y,
            z,
            roll,
            pitch,
            yaw,
        }
    }

    /// Identity pose at the origin.
    #[inline]
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Pose from a position and a heading, with zero roll and pitch.
    #[inline]
    pub fn from_position_yaw(position: Vector3<f32>, yaw: f32) -> Self {
        Self::new(position.x, position.y, position.z, 0.0, 0.0, yaw)
    }

    /// Build a pose from `[x, y, z, roll, pitch, yaw]`.
    ///
    /// Returns `None` unless the slice holds exactly six values.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        match *values {
            [x, y, z, roll, pitch, yaw] => Some(Self::new(x, y, z, roll, pitch, yaw)),
            _ => None,
        }
    }

    /// Split a flat `[x, y, z, roll, pitch, yaw, ...]` buffer into poses.
    ///
    /// Returns `None` if the length is not a multiple of six.
    pub fn parse_many(values: &[f32]) -> Option<Vec<Self>> {
        if values.len() % POSE_STRIDE != 0 {
            return None;
        }
        values
            .chunks_exact(POSE_STRIDE)
            .map(Self::from_slice)
            .collect()
    }

    /// Position as a vector.
    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Orientation as a rotation matrix.
    #[inline]
    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_euler_angles(self.roll, self.pitch, self.yaw)
    }

    /// Transform a point from this pose's local frame to the world frame.
    #[inline]
    pub fn transform_point(&self, point: &Vector3<f32>) -> Vector3<f32> {
        self.rotation() * point + self.position()
    }

    /// True if every component is finite.
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.z, self.roll, self.pitch, self.yaw]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_from_slice() {
        let pose = Pose6D::from_slice(&[1.0, 2.0, 3.0, 0.1, 0.2, 0.3]).unwrap();
        assert_eq!(pose.z, 3.0);
        assert_eq!(pose.yaw, 0.3);
        assert!(Pose6D::from_slice(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_parse_many() {
        let poses = Pose6D::parse_many(&[0.0; 12]).unwrap();
        assert_eq!(poses.len(), 2);
        assert!(Pose6D::parse_many(&[0.0; 7]).is_none());
        assert!(Pose6D::parse_many(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_yaw_rotation() {
        let pose = Pose6D::new(1.0, 0.0, 0.5, 0.0, 0.0, FRAC_PI_2);
        let world = pose.transform_point(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(world.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(world.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(world.z, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_points_forward_axis_down() {
        // Positive pitch about Y tips +X toward -Z
        let pose = Pose6D::new(0.0, 0.0, 0.0, 0.0, FRAC_PI_2, 0.0);
        let world = pose.transform_point(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(world.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_identity_is_default() {
        assert_eq!(Pose6D::identity(), Pose6D::default());
    }
}
