//! Per-voxel state: distance field fields plus salience bookkeeping.

use serde::{Deserialize, Serialize};

/// Weight below which a voxel counts as never observed.
pub const MIN_OBSERVED_WEIGHT: f32 = 1e-6;

/// Hop count used for voxels not reached by any salience seed.
pub const UNREACHED_DISTANCE: u32 = u32::MAX;

/// Classification of a voxel for gain purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoxelStatus {
    /// Unallocated or with no accumulated weight
    Unknown,
    /// Observed and farther than the free threshold from a surface
    Free,
    /// Observed and near or behind a surface
    Occupied,
}

/// A TSDF voxel extended with interestingness fields.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Voxel {
    /// Signed distance to the nearest surface (meters).
    pub distance: f32,
    /// Integration weight.
    pub weight: f32,
    /// Salience score.
    pub interestingness: f32,
    /// Hops from the nearest salience seed.
    pub interesting_distance: u32,
    /// Count of salient observations folded into `interestingness`.
    pub interesting_weight: f32,
    /// Minimum range this voxel was seen from.
    pub viewing_dist: f32,
}

impl Default for Voxel {
    fn default() -> Self {
        Self {
            distance: 0.0,
            weight: 0.0,
            interestingness: 0.0,
            interesting_distance: UNREACHED_DISTANCE,
            interesting_weight: 0.0,
            viewing_dist: f32::MAX,
        }
    }
}

impl Voxel {
    /// True if integration never touched this voxel.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.weight < MIN_OBSERVED_WEIGHT
    }

    /// Classify against a free-space threshold.
    #[inline]
    pub fn status(&self, free_threshold: f32) -> VoxelStatus {
        if self.is_unknown() {
            VoxelStatus::Unknown
        } else if self.distance > free_threshold {
            VoxelStatus::Free
        } else {
            VoxelStatus::Occupied
        }
    }
}

/// Classify an optional voxel; `None` means unallocated, which is Unknown.
#[inline]
pub fn classify(voxel: Option<&Voxel>, free_threshold: f32) -> VoxelStatus {
    voxel.map_or(VoxelStatus::Unknown, |v| v.status(free_threshold))
}

/// Free-space threshold for a given voxel edge length.
#[inline]
pub fn free_threshold(voxel_size: f32) -> f32 {
    voxel_size + MIN_OBSERVED_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_voxel_is_unknown() {
        let v = Voxel::default();
        assert!(v.is_unknown());
        assert_eq!(v.interesting_distance, UNREACHED_DISTANCE);
        assert_eq!(v.viewing_dist, f32::MAX);
    }

    #[test]
    fn test_status_thresholds() {
        let threshold = free_threshold(0.1);
        let mut v = Voxel {
            weight: 1.0,
            distance: 0.2,
            ..Default::default()
        };
        assert_eq!(v.status(threshold), VoxelStatus::Free);

        v.distance = 0.1;
        assert_eq!(v.status(threshold), VoxelStatus::Occupied);

        v.distance = -0.05;
        assert_eq!(v.status(threshold), VoxelStatus::Occupied);

        v.weight = 0.0;
        assert_eq!(v.status(threshold), VoxelStatus::Unknown);
    }

    #[test]
    fn test_classify_unallocated() {
        assert_eq!(classify(None, 0.1), VoxelStatus::Unknown);
    }
}
