//! Core types: grid keys, voxels, poses and labeled clouds.

mod cloud;
mod index;
mod pose;
mod voxel;

pub use cloud::LabeledPointCloud;
pub use index::{Connectivity, GridIndex};
pub use pose::{POSE_STRIDE, Pose6D};
pub use voxel::{
    MIN_OBSERVED_WEIGHT, UNREACHED_DISTANCE, Voxel, VoxelStatus, classify, free_threshold,
};
