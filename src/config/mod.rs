//! Unified configuration loading for Drishti.
//!
//! Loads all configuration from a single YAML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use drishti::config::DrishtiConfig;
//!
//! // Load from default path (configs/config.yaml)
//! let config = DrishtiConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = DrishtiConfig::default();
//!
//! // Convert to runtime config
//! let server = GainServer::new(config.to_server_config());
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`MapSection`] | Voxel size |
//! | [`IntegratorSection`] | TSDF integration strategy and truncation |
//! | [`SensorSection`] | Camera field of view, ray grid, reward decay |
//! | [`DiffusionSection`] | Salience decay, hop bound, neighborhood |
//! | [`SeedingSection`] | Label pass-band and downsample leaf |
//! | [`LibrarySection`] | Motion-primitive grid and baseline sampling |
//!
//! ## Example YAML
//!
//! ```yaml
//! map:
//!   voxel_size: 0.1
//! integrator:
//!   method: merged          # simple | merged
//! sensor:
//!   horizontal_fov_deg: 87.0
//!   vertical_fov_deg: 58.0
//!   max_range: 5.0
//! diffusion:
//!   decay_lambda: 0.9
//!   decay_distance: 5       # hops; 0 disables
//!   connectivity: six       # six | eighteen | twenty_six
//! library:
//!   num_yaw: 32
//!   eval_offset: 2
//!   eval_stride: 4
//! ```

mod defaults;
mod diffusion;
mod drishti;
mod error;
mod library;
mod map;
mod sensor;

// Re-export main types
pub use drishti::DrishtiConfig;
pub use error::ConfigLoadError;

// Re-export section types
pub use diffusion::DiffusionSection;
pub use library::LibrarySection;
pub use map::{IntegratorSection, MapSection};
pub use sensor::{SeedingSection, SensorSection};
