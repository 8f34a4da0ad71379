//! Projective TSDF integration of labeled point clouds.
//!
//! Each point casts a ray from the sensor toward the point and updates the
//! voxels it crosses with a truncated signed distance:
//!
//! ```text
//!  sensor ●──────────────────────[ band ]──
//!         │<── carving (optional) ──>│ p │
//!                                   -τ   +τ
//! ```
//!
//! Voxels inside the truncation band around the point also fold the point's
//! interestingness label into a running mean.

use std::collections::HashMap;

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::{GridIndex, LabeledPointCloud, Pose6D};

use super::layer::TsdfLayer;
use super::raycaster::VoxelRay;

/// Rays shorter than this are dropped.
const MIN_RAY_LENGTH: f32 = 1e-4;

/// Integration strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// One ray per point
    #[default]
    Simple,
    /// Points sharing a voxel are merged into one ray
    Merged,
}

/// Integrator parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegratorConfig {
    /// Strategy.
    pub kind: IntegratorKind,
    /// Truncation distance (meters).
    pub truncation_distance: f32,
    /// Weight ceiling per voxel.
    pub max_weight: f32,
    /// Walk rays from the sensor origin rather than only the band.
    pub voxel_carving: bool,
    /// Points farther than this from the sensor are ignored (meters).
    pub max_ray_length: f32,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            kind: IntegratorKind::Simple,
            truncation_distance: 0.2,
            max_weight: 10_000.0,
            voxel_carving: true,
            max_ray_length: 5.0,
        }
    }
}

/// Statistics from one integration call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegrationResult {
    /// Rays cast into the layer
    pub rays_cast: usize,
    /// Points dropped for length or non-finite coordinates
    pub rays_skipped: usize,
    /// Voxel updates applied
    pub voxels_updated: usize,
}

/// TSDF integrator over a [`TsdfLayer`].
#[derive(Clone, Debug, Default)]
pub struct TsdfIntegrator {
    config: IntegratorConfig,
}

impl TsdfIntegrator {
    /// Create an integrator.
    pub fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Integrate a cloud given in the sensor frame at `sensor_pose`.
    pub fn integrate(
        &self,
        layer: &mut TsdfLayer,
        cloud: &LabeledPointCloud,
        sensor_pose: &Pose6D,
    ) -> IntegrationResult {
        let origin = sensor_pose.position();
        let rotation = sensor_pose.rotation();

        let world: Vec<(Vector3<f32>, f32)> = cloud
            .iter()
            .map(|(p, label)| (rotation * p + origin, label))
            .collect();

        let rays = match self.config.kind {
            IntegratorKind::Simple => world,
            IntegratorKind::Merged => merge_by_voxel(&world, layer.inv_voxel_size()),
        };

        let mut result = IntegrationResult::default();
        for (point, label) in &rays {
            match self.integrate_ray(layer, &origin, point, *label) {
                Some(updated) => {
                    result.rays_cast += 1;
                    result.voxels_updated += updated;
                }
                None => result.rays_skipped += 1,
            }
        }

        debug!(
            "[Integrator] {:?}: {} points, {} rays, {} skipped, {} voxel updates",
            self.config.kind,
            cloud.len(),
            result.rays_cast,
            result.rays_skipped,
            result.voxels_updated
        );
        result
    }

    /// Update the voxels along one ray. Returns `None` if the ray is skipped.
    fn integrate_ray(
        &self,
        layer: &mut TsdfLayer,
        origin: &Vector3<f32>,
        point: &Vector3<f32>,
        label: f32,
    ) -> Option<usize> {
        let delta = point - origin;
        let length = delta.norm();
        if !length.is_finite() || length < MIN_RAY_LENGTH || length > self.config.max_ray_length {
            return None;
        }

        let truncation = self.config.truncation_distance;
        let dir = delta / length;
        let start = if self.config.voxel_carving {
            *origin
        } else {
            point - dir * truncation
        };
        let end = point + dir * truncation;

        let voxel_size = 1.0 / layer.inv_voxel_size();
        let mut updated = 0;
        for index in VoxelRay::new(&start, &end, layer.inv_voxel_size()) {
            let sdf = (point - index.center(voxel_size)).dot(&dir);
            if sdf < -truncation {
                continue;
            }

            let voxel = layer.allocate(index);
            let new_weight = voxel.weight + 1.0;
            voxel.distance = (voxel.distance * voxel.weight + sdf.min(truncation)) / new_weight;
            voxel.weight = new_weight.min(self.config.max_weight);

            if sdf.abs() <= truncation {
                let count = voxel.interesting_weight;
                voxel.interestingness = (voxel.interestingness * count + label) / (count + 1.0);
                voxel.interesting_weight = count + 1.0;
            }
            updated += 1;
        }
        Some(updated)
    }
}

/// Merge points that fall into the same voxel: centroid position, mean label.
///
/// Output order follows first appearance, so integration stays deterministic.
fn merge_by_voxel(points: &[(Vector3<f32>, f32)], inv_voxel_size: f32) -> Vec<(Vector3<f32>, f32)> {
    let mut slots: HashMap<GridIndex, usize> = HashMap::new();
    let mut sums: Vec<(Vector3<f32>, f32, usize)> = Vec::new();

    for (point, label) in points {
        let index = GridIndex::from_point(point, inv_voxel_size);
        let slot = *slots.entry(index).or_insert_with(|| {
            sums.push((Vector3::zeros(), 0.0, 0));
            sums.len() - 1
        });
        let entry = &mut sums[slot];
        entry.0 += point;
        entry.1 += label;
        entry.2 += 1;
    }

    sums.into_iter()
        .map(|(sum, label_sum, count)| {
            let n = count as f32;
            (sum / n, label_sum / n)
        })
        .collect()
}
