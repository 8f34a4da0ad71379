//! Main DrishtiConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::server::ServerConfig;

use super::diffusion::DiffusionSection;
use super::error::ConfigLoadError;
use super::library::LibrarySection;
use super::map::{IntegratorSection, MapSection};
use super::sensor::{SeedingSection, SensorSection};

/// Full Drishti configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DrishtiConfig {
    /// Voxel map settings
    #[serde(default)]
    pub map: MapSection,

    /// Integration settings
    #[serde(default)]
    pub integrator: IntegratorSection,

    /// Camera model
    #[serde(default)]
    pub sensor: SensorSection,

    /// Interestingness diffusion
    #[serde(default)]
    pub diffusion: DiffusionSection,

    /// Seed point filtering
    #[serde(default)]
    pub seeding: SeedingSection,

    /// Motion-primitive library
    #[serde(default)]
    pub library: LibrarySection,
}

impl DrishtiConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/config.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/config.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let invalid = |msg: &str| Err(ConfigLoadError::Invalid(msg.to_string()));

        if !(self.map.voxel_size > 0.0 && self.map.voxel_size.is_finite()) {
            return invalid("map.voxel_size must be positive");
        }
        if self.map.voxels_per_side == 0 {
            return invalid("map.voxels_per_side must be non-zero");
        }
        if !(self.integrator.truncation_distance > 0.0) {
            return invalid("integrator.truncation_distance must be positive");
        }
        let fov_ok = |deg: f32| deg.is_finite() && deg > 0.0 && deg < 180.0;
        if !(fov_ok(self.sensor.horizontal_fov_deg) && fov_ok(self.sensor.vertical_fov_deg)) {
            return invalid("sensor field of view must be within (0, 180) degrees");
        }
        if !(self.sensor.max_range > 0.0 && self.sensor.max_range.is_finite()) {
            return invalid("sensor.max_range must be positive");
        }
        if !(self.sensor.focal_x > 0.0 && self.sensor.focal_y > 0.0) {
            return invalid("sensor focal lengths must be positive");
        }
        if !(0.0..=1.0).contains(&self.diffusion.decay_lambda) {
            return invalid("diffusion.decay_lambda must be within [0, 1]");
        }
        let lib = &self.library;
        if lib.num_forward == 0 || lib.num_vertical == 0 || lib.num_yaw == 0 {
            return invalid("library dimensions must be non-zero");
        }
        if lib.timesteps == 0 || lib.substeps == 0 {
            return invalid("library timesteps and substeps must be non-zero");
        }
        if lib.eval_stride == 0 {
            return invalid("library.eval_stride must be non-zero");
        }
        Ok(())
    }

    /// Convert to ServerConfig for GainServer
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            voxel_size: self.map.voxel_size,
            voxels_per_side: self.map.voxels_per_side,
            integrator: self.integrator.to_integrator_config(),
            frustum: self.sensor.to_frustum_config(),
            diffusion: self.diffusion.to_diffusion_config(),
            seed_filter: self.seeding.to_seed_filter_config(),
            library: self.library.to_library_config(&self.sensor),
            eval_offset: self.library.eval_offset,
            eval_stride: self.library.eval_stride,
        }
    }
}
