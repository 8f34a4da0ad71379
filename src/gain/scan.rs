//! Raycast classification and reward accumulation.
//!
//! Every ray walks from the sensor toward its frustum endpoint:
//!
//! ```text
//!  origin ● ─ ? ─ ? ─ · ─ · ─ ■ ╳ (ray stops at the first occupied voxel)
//!           unknown   free   occupied
//! ```
//!
//! Unknown and occupied voxels earn `interestingness * exp(-k * d^2)` where
//! `d` is the distance from the origin to the voxel center. Each voxel is
//! counted at most once per evaluation; the query scratch tracks which ones
//! were already seen.

use nalgebra::Vector3;

use crate::core::{GridIndex, VoxelStatus, classify, free_threshold};
use crate::map::VoxelMap;

use super::scratch::QueryScratch;

/// Counts and summed reward from one scan.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScanStatus {
    /// Unknown voxels counted
    pub unknown: u32,
    /// Free voxels counted
    pub free: u32,
    /// Occupied voxels counted
    pub occupied: u32,
    /// Summed decayed reward
    pub reward: f32,
    /// Rays dropped as degenerate
    pub skipped_rays: u32,
}

/// Classifies raycast voxels against a map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanEvaluator {
    /// Decay constant `k`.
    pub decay_factor: f32,
    /// Voxels closer than this to the origin are traversed but not counted.
    pub min_range: f32,
}

impl ScanEvaluator {
    /// Create an evaluator.
    pub fn new(decay_factor: f32, min_range: f32) -> Self {
        Self {
            decay_factor,
            min_range,
        }
    }

    /// Classify every voxel along every `origin -> endpoint` ray.
    ///
    /// Newly discovered unknown voxels are appended to `new_unknown`.
    pub fn evaluate<M: VoxelMap + ?Sized>(
        &self,
        map: &M,
        origin: &Vector3<f32>,
        endpoints: &[Vector3<f32>],
        scratch: &mut QueryScratch,
        new_unknown: &mut Vec<GridIndex>,
    ) -> ScanStatus {
        let voxel_size = map.voxel_size();
        let threshold = free_threshold(voxel_size);
        let min_range_sq = self.min_range * self.min_range;
        let mut status = ScanStatus::default();

        for endpoint in endpoints {
            let length_sq = (endpoint - origin).norm_squared();
            if !length_sq.is_finite() || length_sq <= f32::EPSILON {
                status.skipped_rays += 1;
                continue;
            }

            for index in map.raycast(origin, endpoint) {
                let dist_sq = (index.center(voxel_size) - origin).norm_squared();
                let voxel = map.voxel(&index);
                let class = classify(voxel, threshold);

                // Inside the minimum range: not scored, but surfaces still occlude
                if dist_sq < min_range_sq {
                    if class == VoxelStatus::Occupied {
                        break;
                    }
                    continue;
                }
                let interestingness = voxel.map_or(0.0, |v| v.interestingness);

                match class {
                    VoxelStatus::Unknown => {
                        if scratch.mark_observed(index) {
                            status.unknown += 1;
                            status.reward += self.decayed(interestingness, dist_sq);
                            new_unknown.push(index);
                        }
                    }
                    VoxelStatus::Free => {
                        if scratch.mark_observed(index) {
                            status.free += 1;
                        }
                    }
                    VoxelStatus::Occupied => {
                        if scratch.mark_observed(index) {
                            status.occupied += 1;
                            status.reward += self.decayed(interestingness, dist_sq);
                        }
                        break;
                    }
                }
            }
        }

        status
    }

    #[inline]
    fn decayed(&self, interestingness: f32, dist_sq: f32) -> f32 {
        interestingness * (-self.decay_factor * dist_sq).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Voxel;
    use crate::map::TsdfLayer;
    use approx::assert_relative_eq;

    fn observed(distance: f32, interestingness: f32) -> Voxel {
        Voxel {
            distance,
            weight: 1.0,
            interestingness,
            ..Default::default()
        }
    }

    fn ray_x() -> (Vector3<f32>, Vec<Vector3<f32>>) {
        (
            Vector3::new(0.05, 0.05, 0.05),
            vec![Vector3::new(0.95, 0.05, 0.05)],
        )
    }

    #[test]
    fn test_all_unknown_counts_without_reward() {
        let layer = TsdfLayer::new(0.1);
        let (origin, endpoints) = ray_x();
        let mut scratch = QueryScratch::new();
        let mut new_unknown = Vec::new();

        let status = ScanEvaluator::new(1.0, 0.0).evaluate(
            &layer,
            &origin,
            &endpoints,
            &mut scratch,
            &mut new_unknown,
        );
        assert_eq!(status.unknown, 10);
        assert_eq!(status.reward, 0.0);
        assert_eq!(new_unknown.len(), 10);
    }

    #[test]
    fn test_occupied_terminates_ray() {
        let mut layer = TsdfLayer::new(0.1);
        layer.insert(GridIndex::new(1, 0, 0), observed(0.5, 0.0));
        layer.insert(GridIndex::new(3, 0, 0), observed(0.0, 1.0));
        layer.insert(GridIndex::new(5, 0, 0), observed(0.0, 1.0));
        let (origin, endpoints) = ray_x();
        let mut scratch = QueryScratch::new();
        let mut new_unknown = Vec::new();

        let status = ScanEvaluator::new(1.0, 0.0).evaluate(
            &layer,
            &origin,
            &endpoints,
            &mut scratch,
            &mut new_unknown,
        );
        assert_eq!(status.free, 1);
        assert_eq!(status.occupied, 1);
        assert_eq!(status.unknown, 2);
        assert!(!scratch.is_observed(&GridIndex::new(4, 0, 0)));
        assert!(!scratch.is_observed(&GridIndex::new(5, 0, 0)));
        // Voxel 3 is 0.3 m from the origin
        assert_relative_eq!(status.reward, (-0.09f32).exp(), epsilon = 1e-5);
    }

    #[test]
    fn test_voxels_counted_once_across_rays() {
        let layer = TsdfLayer::new(0.1);
        let origin = Vector3::new(0.05, 0.05, 0.05);
        let endpoints = vec![
            Vector3::new(0.45, 0.05, 0.05),
            Vector3::new(0.45, 0.05, 0.05),
        ];
        let mut scratch = QueryScratch::new();
        let mut new_unknown = Vec::new();

        let status = ScanEvaluator::new(1.0, 0.0).evaluate(
            &layer,
            &origin,
            &endpoints,
            &mut scratch,
            &mut new_unknown,
        );
        assert_eq!(status.unknown, 5);
    }

    #[test]
    fn test_degenerate_rays_skipped() {
        let layer = TsdfLayer::new(0.1);
        let origin = Vector3::new(0.05, 0.05, 0.05);
        let endpoints = vec![origin, Vector3::new(f32::NAN, 0.0, 0.0)];
        let mut scratch = QueryScratch::new();
        let mut new_unknown = Vec::new();

        let status = ScanEvaluator::new(1.0, 0.0).evaluate(
            &layer,
            &origin,
            &endpoints,
            &mut scratch,
            &mut new_unknown,
        );
        assert_eq!(status.skipped_rays, 2);
        assert!(scratch.is_clean());
    }

    #[test]
    fn test_min_range_skips_near_voxels() {
        let layer = TsdfLayer::new(0.1);
        let (origin, endpoints) = ray_x();
        let mut scratch = QueryScratch::new();
        let mut new_unknown = Vec::new();

        let status = ScanEvaluator::new(1.0, 0.25).evaluate(
            &layer,
            &origin,
            &endpoints,
            &mut scratch,
            &mut new_unknown,
        );
        // Centers at 0.0, 0.1, 0.2 are inside the minimum range
        assert_eq!(status.unknown, 7);
    }

    #[test]
    fn test_surface_inside_min_range_still_occludes() {
        let mut layer = TsdfLayer::new(0.1);
        layer.insert(GridIndex::new(1, 0, 0), observed(0.0, 1.0));
        layer.insert(
            GridIndex::new(6, 0, 0),
            Voxel {
                interestingness: 1.0,
                ..Default::default()
            },
        );
        let (origin, endpoints) = ray_x();
        let mut scratch = QueryScratch::new();
        let mut new_unknown = Vec::new();

        let status = ScanEvaluator::new(1.0, 0.25).evaluate(
            &layer,
            &origin,
            &endpoints,
            &mut scratch,
            &mut new_unknown,
        );
        assert_eq!(status.reward, 0.0);
        assert_eq!(status.unknown, 0);
        assert_eq!(status.occupied, 0);
        assert!(!scratch.is_observed(&GridIndex::new(6, 0, 0)));
        assert!(new_unknown.is_empty());
    }
}
