//! Test utilities for Drishti integration tests.
//!
//! Builders for synthetic maps, labeled clouds and single-ray cameras.

#![allow(dead_code)]

use drishti::map::TsdfLayer;
use drishti::motion::PrimitiveLibraryConfig;
use drishti::sensor::FrustumConfig;
use drishti::{GridIndex, LabeledPointCloud, ServerConfig, Voxel};
use nalgebra::Vector3;

/// Install a test logger once per binary.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A camera that casts exactly one ray, 0.5 degrees off the +X axis.
pub fn single_ray_frustum() -> FrustumConfig {
    FrustumConfig {
        horizontal_fov: 1f32.to_radians(),
        vertical_fov: 1f32.to_radians(),
        horizontal_resolution: 2f32.to_radians(),
        vertical_resolution: 2f32.to_radians(),
        ..Default::default()
    }
}

/// Server configuration with a single-ray camera and a small library.
pub fn single_ray_config() -> ServerConfig {
    ServerConfig {
        frustum: single_ray_frustum(),
        library: small_library(),
        ..Default::default()
    }
}

/// Six primitives: one speed, two vertical rates, three yaw commands.
pub fn small_library() -> PrimitiveLibraryConfig {
    PrimitiveLibraryConfig {
        num_vertical: 2,
        num_yaw: 3,
        ..Default::default()
    }
}

/// An observed voxel with the given signed distance and label.
pub fn observed(distance: f32, interestingness: f32) -> Voxel {
    Voxel {
        distance,
        weight: 1.0,
        interestingness,
        ..Default::default()
    }
}

/// Occupied voxel (surface) for a 0.1 m grid.
pub fn occupied(interestingness: f32) -> Voxel {
    observed(0.0, interestingness)
}

/// Allocate every voxel of a cube without observing it.
pub fn unknown_cube(layer: &mut TsdfLayer, min: GridIndex, max: GridIndex) {
    for x in min.x..=max.x {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                layer.allocate(GridIndex::new(x, y, z));
            }
        }
    }
}

/// Planar wall of points at `x`, spanning `[-half, half]` in Y and Z.
pub fn wall_cloud(x: f32, half: f32, spacing: f32, label: f32) -> LabeledPointCloud {
    let steps = (2.0 * half / spacing).round() as i32;
    let mut points = Vec::new();
    for iy in 0..=steps {
        for iz in 0..=steps {
            points.push(Vector3::new(
                x,
                -half + iy as f32 * spacing,
                -half + iz as f32 * spacing,
            ));
        }
    }
    LabeledPointCloud::uniform(points, label)
}

/// Flatten poses into the `[x, y, z, roll, pitch, yaw]` request layout.
pub fn flatten_poses(poses: &[[f32; 6]]) -> Vec<f32> {
    poses.iter().flat_map(|p| p.iter().copied()).collect()
}
