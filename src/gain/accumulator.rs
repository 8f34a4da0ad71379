//! Per-evaluation gain accumulator.

use crate::core::GridIndex;

/// Counts and reward from evaluating one candidate pose.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumetricGain {
    /// Reward from the latest evaluation.
    pub gain: f32,
    /// Sum of `gain` over every evaluation since creation or [`clear_totals`](Self::clear_totals).
    pub accumulative_gain: f32,
    /// Unknown voxels seen
    pub num_unknown_voxels: u32,
    /// Free voxels seen
    pub num_free_voxels: u32,
    /// Occupied voxels seen
    pub num_occupied_voxels: u32,
    /// The view saw both unknown and known space.
    pub is_frontier: bool,
    /// Unknown voxels discovered by the latest evaluation, in visit order.
    pub new_unknown: Vec<GridIndex>,
}

impl VolumetricGain {
    /// Reset per-evaluation fields. The running total is kept.
    pub fn reset(&mut self) {
        self.gain = 0.0;
        self.num_unknown_voxels = 0;
        self.num_free_voxels = 0;
        self.num_occupied_voxels = 0;
        self.is_frontier = false;
        self.new_unknown.clear();
    }

    /// Reset everything including the running total.
    pub fn clear_totals(&mut self) {
        self.reset();
        self.accumulative_gain = 0.0;
    }

    /// Total voxels classified by the latest evaluation.
    pub fn num_voxels(&self) -> u32 {
        self.num_unknown_voxels + self.num_free_voxels + self.num_occupied_voxels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_running_total() {
        let mut acc = VolumetricGain {
            gain: 2.0,
            accumulative_gain: 5.0,
            num_unknown_voxels: 3,
            is_frontier: true,
            new_unknown: vec![GridIndex::new(0, 0, 0)],
            ..Default::default()
        };
        acc.reset();
        assert_eq!(acc.gain, 0.0);
        assert_eq!(acc.num_voxels(), 0);
        assert!(!acc.is_frontier);
        assert!(acc.new_unknown.is_empty());
        assert_eq!(acc.accumulative_gain, 5.0);

        acc.clear_totals();
        assert_eq!(acc.accumulative_gain, 0.0);
    }
}
