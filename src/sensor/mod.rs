//! Sensor models: the camera frustum and seed point filtering.

mod filter;
mod frustum;

pub use filter::{SeedFilterConfig, SeedFilterResult, filter_seed_points};
pub use frustum::{FrustumConfig, FrustumModel};
