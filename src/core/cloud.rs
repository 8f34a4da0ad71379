//! Point cloud with a per-point salience label.

use nalgebra::Vector3;

use crate::error::{GainError, Result};

/// Points plus one interestingness label per point.
///
/// Labels are carried in the intensity channel by upstream producers, so
/// they are usually in `[0, 1]`.
#[derive(Clone, Debug, Default)]
pub struct LabeledPointCloud {
    /// Point positions.
    pub points: Vec<Vector3<f32>>,
    /// Per-point interestingness.
    pub interestingness: Vec<f32>,
}

impl LabeledPointCloud {
    /// Create a cloud from matching point and label vectors.
    pub fn new(points: Vec<Vector3<f32>>, interestingness: Vec<f32>) -> Result<Self> {
        let cloud = Self {
            points,
            interestingness,
        };
        cloud.validate()?;
        Ok(cloud)
    }

    /// Create a cloud with one shared label for every point.
    pub fn uniform(points: Vec<Vector3<f32>>, label: f32) -> Self {
        let interestingness = vec![label; points.len()];
        Self {
            points,
            interestingness,
        }
    }

    /// Check that every point has exactly one label.
    pub fn validate(&self) -> Result<()> {
        if self.points.len() != self.interestingness.len() {
            return Err(GainError::MismatchedCloud {
                points: self.points.len(),
                labels: self.interestingness.len(),
            });
        }
        Ok(())
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the cloud has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a labeled point.
    pub fn push(&mut self, point: Vector3<f32>, label: f32) {
        self.points.push(point);
        self.interestingness.push(label);
    }

    /// Iterate `(point, label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Vector3<f32>, f32)> {
        self.points.iter().zip(self.interestingness.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = LabeledPointCloud::new(vec![Vector3::zeros(); 3], vec![0.5; 2]).unwrap_err();
        assert!(matches!(
            err,
            GainError::MismatchedCloud {
                points: 3,
                labels: 2
            }
        ));
    }

    #[test]
    fn test_push_and_iter() {
        let mut cloud = LabeledPointCloud::default();
        cloud.push(Vector3::new(1.0, 0.0, 0.0), 0.7);
        cloud.push(Vector3::new(2.0, 0.0, 0.0), 0.2);
        let labels: Vec<f32> = cloud.iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec![0.7, 0.2]);
        assert_eq!(cloud.len(), 2);
    }
}
