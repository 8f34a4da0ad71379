//! Interestingness diffusion section.

use serde::{Deserialize, Serialize};

use crate::core::Connectivity;
use crate::interest::DiffusionConfig;

use super::defaults;

/// Diffusion section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiffusionSection {
    /// Per-hop decay in [0, 1]
    #[serde(default = "defaults::decay_lambda")]
    pub decay_lambda: f32,

    /// Hop bound; 0 disables diffusion
    #[serde(default = "defaults::decay_distance")]
    pub decay_distance: u32,

    /// Neighborhood: six, eighteen or twenty_six
    #[serde(default = "defaults::connectivity")]
    pub connectivity: Connectivity,
}

impl Default for DiffusionSection {
    fn default() -> Self {
        Self {
            decay_lambda: defaults::decay_lambda(),
            decay_distance: defaults::decay_distance(),
            connectivity: defaults::connectivity(),
        }
    }
}

impl DiffusionSection {
    /// Convert to DiffusionConfig
    pub fn to_diffusion_config(&self) -> DiffusionConfig {
        DiffusionConfig {
            decay_lambda: self.decay_lambda,
            max_distance: self.decay_distance,
            connectivity: self.connectivity,
        }
    }
}
