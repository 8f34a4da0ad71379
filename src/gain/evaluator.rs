//! Gain for a single candidate pose.

use log::trace;
use nalgebra::Vector3;

use crate::core::Pose6D;
use crate::map::VoxelMap;
use crate::sensor::{FrustumConfig, FrustumModel};

use super::accumulator::VolumetricGain;
use super::scan::{ScanEvaluator, ScanStatus};
use super::scratch::QueryScratch;

/// Ties the frustum model to the scan evaluator.
///
/// The accumulator and endpoint buffer are reused between candidates.
#[derive(Clone, Debug)]
pub struct GainEvaluator {
    frustum: FrustumModel,
    scan: ScanEvaluator,
    endpoints: Vec<Vector3<f32>>,
    accumulator: VolumetricGain,
}

impl GainEvaluator {
    /// Create an evaluator for a camera configuration.
    pub fn new(config: FrustumConfig) -> Self {
        let frustum = FrustumModel::new(config);
        let scan = ScanEvaluator::new(frustum.decay_factor(), frustum.config().min_range);
        let endpoints = Vec::with_capacity(frustum.endpoints().len());
        Self {
            frustum,
            scan,
            endpoints,
            accumulator: VolumetricGain::default(),
        }
    }

    /// Swap in a new camera configuration.
    pub fn reconfigure(&mut self, config: FrustumConfig) {
        self.frustum.reconfigure(config);
        self.scan = ScanEvaluator::new(self.frustum.decay_factor(), self.frustum.config().min_range);
    }

    /// Score one pose. Observed marks are left in `scratch` for the caller to clear.
    pub fn evaluate<M: VoxelMap + ?Sized>(
        &mut self,
        map: &M,
        pose: &Pose6D,
        scratch: &mut QueryScratch,
    ) -> f32 {
        self.accumulator.reset();
        self.frustum.endpoints_world(pose, &mut self.endpoints);

        let origin = pose.position();
        let status: ScanStatus = self.scan.evaluate(
            map,
            &origin,
            &self.endpoints,
            scratch,
            &mut self.accumulator.new_unknown,
        );

        let acc = &mut self.accumulator;
        acc.num_unknown_voxels = status.unknown;
        acc.num_free_voxels = status.free;
        acc.num_occupied_voxels = status.occupied;
        acc.gain = status.reward;
        acc.accumulative_gain += status.reward;
        acc.is_frontier = status.unknown > 0 && status.free + status.occupied > 0;

        trace!(
            "[Gain] pose ({:.2}, {:.2}, {:.2}) yaw {:.2}: gain {:.4}, unknown {}, free {}, occupied {}",
            pose.x,
            pose.y,
            pose.z,
            pose.yaw,
            acc.gain,
            acc.num_unknown_voxels,
            acc.num_free_voxels,
            acc.num_occupied_voxels
        );
        acc.gain
    }

    /// Result of the latest evaluation.
    pub fn accumulator(&self) -> &VolumetricGain {
        &self.accumulator
    }

    /// Reset the running total.
    pub fn clear_totals(&mut self) {
        self.accumulator.clear_totals();
    }

    /// Frustum model in use.
    pub fn frustum(&self) -> &FrustumModel {
        &self.frustum
    }
}

impl Default for GainEvaluator {
    fn default() -> Self {
        Self::new(FrustumConfig::default())
    }
}
