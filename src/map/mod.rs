//! Sparse TSDF voxel map: storage, traversal and integration.

mod integrator;
mod layer;
mod raycaster;

pub use integrator::{IntegrationResult, IntegratorConfig, IntegratorKind, TsdfIntegrator};
pub use layer::{DEFAULT_VOXELS_PER_SIDE, TsdfLayer, VoxelMap};
pub use raycaster::VoxelRay;
