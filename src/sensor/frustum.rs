//! Discretized camera field of view.
//!
//! The frustum is sampled on a regular angular grid. Rows run over elevation
//! (outer loop), columns over azimuth (inner loop):
//!
//! ```text
//!            +v/2 ┌─────────────────────┐
//!                 │ · · · · · · · · · · │  row = height - 1
//!                 │ · · · · · · · · · · │
//!   x forward ──► │ · · · · ·+· · · · · │
//!                 │ · · · · · · · · · · │
//!            -v/2 └─────────────────────┘  row = 0
//!                -h/2                 +h/2
//! ```
//!
//! Each sample is an endpoint at `max_range` along the normalized direction
//! `(1, tan az, tan el)`. Angles are generated as `-half + i * resolution`
//! so the grid is identical on every rebuild.

use log::{debug, warn};
use nalgebra::Vector3;

use crate::core::Pose6D;

/// Fallback angular step when a non-positive resolution is configured.
const FALLBACK_RESOLUTION: f32 = std::f32::consts::PI / 180.0;

/// Upper bound on angles per axis.
const MAX_SAMPLES_PER_AXIS: usize = 1 << 16;

/// Field-of-view parameters. Angles in radians, ranges in meters.
#[derive(Clone, Debug, PartialEq)]
pub struct FrustumConfig {
    /// Full horizontal field of view.
    pub horizontal_fov: f32,
    /// Full vertical field of view.
    pub vertical_fov: f32,
    /// Azimuth step.
    pub horizontal_resolution: f32,
    /// Elevation step.
    pub vertical_resolution: f32,
    /// Voxels closer than this to the sensor are not scored.
    pub min_range: f32,
    /// Ray length.
    pub max_range: f32,
    /// Focal length along x (pixels).
    pub focal_x: f32,
    /// Focal length along y (pixels).
    pub focal_y: f32,
    /// Scales the range decay of rewards.
    pub area_factor: f32,
}

impl Default for FrustumConfig {
    fn default() -> Self {
        Self {
            horizontal_fov: 87f32.to_radians(),
            vertical_fov: 58f32.to_radians(),
            horizontal_resolution: 5f32.to_radians(),
            vertical_resolution: 5f32.to_radians(),
            min_range: 0.0,
            max_range: 5.0,
            focal_x: 239.351_53,
            focal_y: 239.052_8,
            area_factor: 1e5,
        }
    }
}

impl FrustumConfig {
    /// Reward decay constant `k` in `exp(-k * d^2)`.
    #[inline]
    pub fn decay_factor(&self) -> f32 {
        self.area_factor / (self.focal_x * self.focal_y)
    }
}

/// Cached frustum endpoints in the sensor frame.
#[derive(Clone, Debug)]
pub struct FrustumModel {
    config: FrustumConfig,
    endpoints: Vec<Vector3<f32>>,
    width: usize,
    height: usize,
}

impl FrustumModel {
    /// Build the endpoint cache.
    pub fn new(config: FrustumConfig) -> Self {
        let mut model = Self {
            config,
            endpoints: Vec::new(),
            width: 0,
            height: 0,
        };
        model.initialize();
        model
    }

    /// Replace the configuration and rebuild the cache.
    pub fn reconfigure(&mut self, config: FrustumConfig) {
        self.config = config;
        self.initialize();
    }

    /// Rebuild the endpoint cache.
    ///
    /// Each endpoint lies at `max_range` along the normalized direction
    /// `(1, tan az, tan el)`, so every ray has the same length. Placing
    /// endpoints on the plane `x = max_range` instead would stretch the
    /// off-axis rays.
    fn initialize(&mut self) {
        let h_res = effective_resolution(self.config.horizontal_resolution);
        let v_res = effective_resolution(self.config.vertical_resolution);

        let azimuths = sample_angles(self.config.horizontal_fov, h_res);
        let elevations = sample_angles(self.config.vertical_fov, v_res);

        self.endpoints.clear();
        self.endpoints.reserve(azimuths.len() * elevations.len());
        for el in &elevations {
            for az in &azimuths {
                let dir = Vector3::new(1.0, az.tan(), el.tan()).normalize();
                self.endpoints.push(dir * self.config.max_range);
            }
        }
        self.width = azimuths.len();
        self.height = elevations.len();

        debug!(
            "[Frustum] {} rays ({} x {}), max range {:.2} m",
            self.endpoints.len(),
            self.width,
            self.height,
            self.config.max_range
        );
    }

    /// Endpoints in the sensor frame.
    #[inline]
    pub fn endpoints(&self) -> &[Vector3<f32>] {
        &self.endpoints
    }

    /// Write world-frame endpoints for `pose` into `out`, replacing its contents.
    pub fn endpoints_world(&self, pose: &Pose6D, out: &mut Vec<Vector3<f32>>) {
        let rotation = pose.rotation();
        let translation = pose.position();
        out.clear();
        out.extend(self.endpoints.iter().map(|e| rotation * e + translation));
    }

    /// Rays per row.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &FrustumConfig {
        &self.config
    }

    /// Reward decay constant.
    #[inline]
    pub fn decay_factor(&self) -> f32 {
        self.config.decay_factor()
    }
}

impl Default for FrustumModel {
    fn default() -> Self {
        Self::new(FrustumConfig::default())
    }
}

fn effective_resolution(resolution: f32) -> f32 {
    if resolution > 0.0 && resolution.is_finite() {
        resolution
    } else {
        warn!(
            "[Frustum] invalid angular resolution {}, falling back to {:.1} deg",
            resolution,
            FALLBACK_RESOLUTION.to_degrees()
        );
        FALLBACK_RESOLUTION
    }
}

/// Angles `-fov/2 + i * step` that stay below `fov/2`.
///
/// A non-finite or non-positive field of view yields no angles.
fn sample_angles(fov: f32, step: f32) -> Vec<f32> {
    if !(fov.is_finite() && fov > 0.0) {
        warn!("[Frustum] invalid field of view {}, no rays generated", fov);
        return Vec::new();
    }
    let half = fov / 2.0;
    let count = ((fov / step).ceil() as usize).min(MAX_SAMPLES_PER_AXIS);
    (0..count)
        .map(|i| -half + i as f32 * step)
        .take_while(|angle| *angle < half)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_invalid_fov_yields_no_rays() {
        for fov in [f32::NAN, f32::INFINITY, 0.0, -1.0] {
            let model = FrustumModel::new(FrustumConfig {
                horizontal_fov: fov,
                ..Default::default()
            });
            assert_eq!(model.width(), 0);
            assert!(model.endpoints().is_empty());
        }
    }

    #[test]
    fn test_off_axis_rays_keep_full_length() {
        let model = FrustumModel::default();
        let corner = model.endpoints()[0];
        assert_relative_eq!(corner.norm(), 5.0, epsilon = 1e-4);
        assert!(corner.x < 5.0);
    }

    #[test]
    fn test_default_grid_size() {
        let model = FrustumModel::default();
        // 87 / 5 -> 18 columns, 58 / 5 -> 12 rows
        assert_eq!(model.width(), 18);
        assert_eq!(model.height(), 12);
        assert_eq!(model.endpoints().len(), 18 * 12);
    }

    #[test]
    fn test_endpoints_at_max_range() {
        let model = FrustumModel::default();
        for e in model.endpoints() {
            assert_relative_eq!(e.norm(), 5.0, epsilon = 1e-4);
            assert!(e.x > 0.0);
        }
    }

    #[test]
    fn test_order_elevation_outer() {
        let model = FrustumModel::default();
        let eps = model.endpoints();
        // First row shares the lowest elevation, azimuth increases along it
        assert!(eps[0].z < 0.0);
        assert!(eps[0].y < eps[1].y);
        assert!(eps[model.width()].z > eps[0].z);
    }

    #[test]
    fn test_non_positive_resolution_falls_back() {
        let model = FrustumModel::new(FrustumConfig {
            horizontal_fov: 10f32.to_radians(),
            vertical_fov: 4f32.to_radians(),
            horizontal_resolution: 0.0,
            vertical_resolution: -1.0,
            ..Default::default()
        });
        assert!((10..=11).contains(&model.width()));
        assert!((4..=5).contains(&model.height()));
    }

    #[test]
    fn test_reconfigure_rebuilds() {
        let mut model = FrustumModel::default();
        model.reconfigure(FrustumConfig {
            max_range: 2.0,
            ..Default::default()
        });
        assert_relative_eq!(model.endpoints()[0].norm(), 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_world_transform() {
        let model = FrustumModel::new(FrustumConfig {
            horizontal_fov: 1f32.to_radians(),
            vertical_fov: 1f32.to_radians(),
            horizontal_resolution: 2f32.to_radians(),
            vertical_resolution: 2f32.to_radians(),
            ..Default::default()
        });
        assert_eq!(model.endpoints().len(), 1);

        let pose = Pose6D::new(1.0, 2.0, 3.0, 0.0, 0.0, FRAC_PI_2);
        let mut out = Vec::new();
        model.endpoints_world(&pose, &mut out);
        // Single ray near forward; yaw 90 deg maps it to +Y
        assert_relative_eq!(out[0].x, 1.0, epsilon = 0.1);
        assert_relative_eq!(out[0].y, 7.0, epsilon = 0.01);
        assert_relative_eq!(out[0].z, 3.0, epsilon = 0.1);
    }

    #[test]
    fn test_decay_factor() {
        let config = FrustumConfig::default();
        assert_relative_eq!(config.decay_factor(), 1e5 / (239.351_53 * 239.052_8), epsilon = 1e-4);
    }
}
