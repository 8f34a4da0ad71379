//! Camera and seed filter configuration sections.

use serde::{Deserialize, Serialize};

use crate::sensor::{FrustumConfig, SeedFilterConfig};

use super::defaults;

/// Camera section (angles in degrees)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SensorSection {
    /// Horizontal field of view (degrees)
    #[serde(default = "defaults::horizontal_fov_deg")]
    pub horizontal_fov_deg: f32,

    /// Vertical field of view (degrees)
    #[serde(default = "defaults::vertical_fov_deg")]
    pub vertical_fov_deg: f32,

    /// Azimuth step (degrees)
    #[serde(default = "defaults::resolution_deg")]
    pub horizontal_resolution_deg: f32,

    /// Elevation step (degrees)
    #[serde(default = "defaults::resolution_deg")]
    pub vertical_resolution_deg: f32,

    /// Minimum scored range (meters)
    #[serde(default)]
    pub min_range: f32,

    /// Ray length (meters)
    #[serde(default = "defaults::max_range")]
    pub max_range: f32,

    /// Focal length x (pixels)
    #[serde(default = "defaults::focal_x")]
    pub focal_x: f32,

    /// Focal length y (pixels)
    #[serde(default = "defaults::focal_y")]
    pub focal_y: f32,

    /// Range decay scale
    #[serde(default = "defaults::area_factor")]
    pub area_factor: f32,
}

impl Default for SensorSection {
    fn default() -> Self {
        Self {
            horizontal_fov_deg: defaults::horizontal_fov_deg(),
            vertical_fov_deg: defaults::vertical_fov_deg(),
            horizontal_resolution_deg: defaults::resolution_deg(),
            vertical_resolution_deg: defaults::resolution_deg(),
            min_range: 0.0,
            max_range: defaults::max_range(),
            focal_x: defaults::focal_x(),
            focal_y: defaults::focal_y(),
            area_factor: defaults::area_factor(),
        }
    }
}

impl SensorSection {
    /// Convert to FrustumConfig
    pub fn to_frustum_config(&self) -> FrustumConfig {
        FrustumConfig {
            horizontal_fov: self.horizontal_fov_deg.to_radians(),
            vertical_fov: self.vertical_fov_deg.to_radians(),
            horizontal_resolution: self.horizontal_resolution_deg.to_radians(),
            vertical_resolution: self.vertical_resolution_deg.to_radians(),
            min_range: self.min_range,
            max_range: self.max_range,
            focal_x: self.focal_x,
            focal_y: self.focal_y,
            area_factor: self.area_factor,
        }
    }
}

/// Seed extraction section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedingSection {
    /// Lowest label kept
    #[serde(default = "defaults::min_intensity")]
    pub min_intensity: f32,

    /// Highest label kept
    #[serde(default = "defaults::max_intensity")]
    pub max_intensity: f32,

    /// Downsample leaf (meters)
    #[serde(default = "defaults::leaf_size")]
    pub leaf_size: f32,
}

impl Default for SeedingSection {
    fn default() -> Self {
        Self {
            min_intensity: defaults::min_intensity(),
            max_intensity: defaults::max_intensity(),
            leaf_size: defaults::leaf_size(),
        }
    }
}

impl SeedingSection {
    /// Convert to SeedFilterConfig
    pub fn to_seed_filter_config(&self) -> SeedFilterConfig {
        SeedFilterConfig {
            min_intensity: self.min_intensity,
            max_intensity: self.max_intensity,
            leaf_size: self.leaf_size,
        }
    }
}
