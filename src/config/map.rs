//! Map and integrator configuration sections.

use serde::{Deserialize, Serialize};

use crate::map::{IntegratorConfig, IntegratorKind};

use super::defaults;

/// Voxel map section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapSection {
    /// Voxel edge length (meters)
    #[serde(default = "defaults::voxel_size")]
    pub voxel_size: f32,

    /// Voxels per block edge; a touched voxel allocates its whole block
    #[serde(default = "defaults::voxels_per_side")]
    pub voxels_per_side: usize,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            voxel_size: defaults::voxel_size(),
            voxels_per_side: defaults::voxels_per_side(),
        }
    }
}

/// TSDF integrator section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntegratorSection {
    /// Integration strategy: "simple" or "merged"
    #[serde(default = "defaults::integrator_method")]
    pub method: IntegratorKind,

    /// Truncation distance (meters)
    #[serde(default = "defaults::truncation_distance")]
    pub truncation_distance: f32,

    /// Per-voxel weight ceiling
    #[serde(default = "defaults::max_weight")]
    pub max_weight: f32,

    /// Carve free space from the sensor to the surface
    #[serde(default = "defaults::enabled")]
    pub voxel_carving: bool,

    /// Ignore points farther than this (meters)
    #[serde(default = "defaults::max_ray_length")]
    pub max_ray_length: f32,
}

impl Default for IntegratorSection {
    fn default() -> Self {
        Self {
            method: defaults::integrator_method(),
            truncation_distance: defaults::truncation_distance(),
            max_weight: defaults::max_weight(),
            voxel_carving: true,
            max_ray_length: defaults::max_ray_length(),
        }
    }
}

impl IntegratorSection {
    /// Convert to IntegratorConfig
    pub fn to_integrator_config(&self) -> IntegratorConfig {
        IntegratorConfig {
            kind: self.method,
            truncation_distance: self.truncation_distance,
            max_weight: self.max_weight,
            voxel_carving: self.voxel_carving,
            max_ray_length: self.max_ray_length,
        }
    }
}
