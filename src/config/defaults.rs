//! Default value functions for serde deserialization.

use crate::core::Connectivity;
use crate::map::IntegratorKind;

pub fn voxel_size() -> f32 {
    0.1
}

pub fn voxels_per_side() -> usize {
    16
}

pub fn integrator_method() -> IntegratorKind {
    IntegratorKind::Simple
}

pub fn truncation_distance() -> f32 {
    0.2
}

pub fn max_weight() -> f32 {
    10_000.0
}

pub fn enabled() -> bool {
    true
}

pub fn max_ray_length() -> f32 {
    5.0
}

pub fn horizontal_fov_deg() -> f32 {
    87.0
}

pub fn vertical_fov_deg() -> f32 {
    58.0
}

pub fn resolution_deg() -> f32 {
    5.0
}

pub fn max_range() -> f32 {
    5.0
}

pub fn focal_x() -> f32 {
    239.351_53
}

pub fn focal_y() -> f32 {
    239.052_8
}

pub fn area_factor() -> f32 {
    1e5
}

pub fn decay_lambda() -> f32 {
    1.0
}

pub fn decay_distance() -> u32 {
    5
}

pub fn connectivity() -> Connectivity {
    Connectivity::Six
}

pub fn min_intensity() -> f32 {
    0.5
}

pub fn max_intensity() -> f32 {
    1.0
}

pub fn leaf_size() -> f32 {
    0.05
}

pub fn num_forward() -> usize {
    1
}

pub fn num_vertical() -> usize {
    8
}

pub fn num_yaw() -> usize {
    32
}

pub fn forward_speed() -> f32 {
    0.75
}

pub fn timesteps() -> usize {
    15
}

pub fn substeps() -> usize {
    10
}

pub fn horizon() -> f32 {
    5.0
}

pub fn alpha_v() -> f32 {
    0.92
}

pub fn alpha_psi() -> f32 {
    0.9293
}

pub fn eval_offset() -> usize {
    2
}

pub fn eval_stride() -> usize {
    4
}
