//! Motion-primitive library section.

use serde::{Deserialize, Serialize};

use crate::motion::PrimitiveLibraryConfig;

use super::defaults;
use super::sensor::SensorSection;

/// Library section. Command spans follow the camera field of view.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibrarySection {
    /// Forward speed choices
    #[serde(default = "defaults::num_forward")]
    pub num_forward: usize,

    /// Climb rate choices
    #[serde(default = "defaults::num_vertical")]
    pub num_vertical: usize,

    /// Heading choices
    #[serde(default = "defaults::num_yaw")]
    pub num_yaw: usize,

    /// Slowest forward speed (m/s)
    #[serde(default = "defaults::forward_speed")]
    pub min_forward_speed: f32,

    /// Fastest forward speed (m/s)
    #[serde(default = "defaults::forward_speed")]
    pub max_forward_speed: f32,

    /// Starting forward speed (m/s)
    #[serde(default = "defaults::forward_speed")]
    pub initial_forward_speed: f32,

    /// Samples per primitive
    #[serde(default = "defaults::timesteps")]
    pub timesteps: usize,

    /// Integration steps per sample
    #[serde(default = "defaults::substeps")]
    pub substeps: usize,

    /// Simulated duration (seconds)
    #[serde(default = "defaults::horizon")]
    pub horizon: f32,

    /// Speed low-pass constant
    #[serde(default = "defaults::alpha_v")]
    pub alpha_v: f32,

    /// Heading low-pass constant
    #[serde(default = "defaults::alpha_psi")]
    pub alpha_psi: f32,

    /// First scored timestep of the baseline query
    #[serde(default = "defaults::eval_offset")]
    pub eval_offset: usize,

    /// Timesteps between scored samples
    #[serde(default = "defaults::eval_stride")]
    pub eval_stride: usize,
}

impl Default for LibrarySection {
    fn default() -> Self {
        Self {
            num_forward: defaults::num_forward(),
            num_vertical: defaults::num_vertical(),
            num_yaw: defaults::num_yaw(),
            min_forward_speed: defaults::forward_speed(),
            max_forward_speed: defaults::forward_speed(),
            initial_forward_speed: defaults::forward_speed(),
            timesteps: defaults::timesteps(),
            substeps: defaults::substeps(),
            horizon: defaults::horizon(),
            alpha_v: defaults::alpha_v(),
            alpha_psi: defaults::alpha_psi(),
            eval_offset: defaults::eval_offset(),
            eval_stride: defaults::eval_stride(),
        }
    }
}

impl LibrarySection {
    /// Convert to PrimitiveLibraryConfig
    pub fn to_library_config(&self, sensor: &SensorSection) -> PrimitiveLibraryConfig {
        PrimitiveLibraryConfig {
            num_forward: self.num_forward,
            num_vertical: self.num_vertical,
            num_yaw: self.num_yaw,
            min_forward_speed: self.min_forward_speed,
            max_forward_speed: self.max_forward_speed,
            initial_forward_speed: self.initial_forward_speed,
            horizontal_fov: sensor.horizontal_fov_deg.to_radians(),
            vertical_fov: sensor.vertical_fov_deg.to_radians(),
            timesteps: self.timesteps,
            substeps: self.substeps,
            horizon: self.horizon,
            alpha_v: self.alpha_v,
            alpha_psi: self.alpha_psi,
        }
    }
}
