//! Query orchestration.
//!
//! [`GainServer`] owns the voxel map and every stage of the pipeline:
//!
//! ```text
//!  labeled cloud ──► integrate ──► label_seeds ──► diffuse
//!                                                     │
//!  candidate poses ─────────────► evaluate_gain ◄─────┘ ──► gains
//!  robot pose ──► library.transformed ──► evaluate_library ──► gains
//! ```
//!
//! Single-shot requests ([`GainServer::calc_info_gain`]) run the whole chain
//! on a scratch map and clear it afterwards, so consecutive requests are
//! independent. The persistent path
//! ([`GainServer::insert_pointcloud_with_interestingness`]) accumulates into
//! the same map until [`GainServer::clear`].
//!
//! Methods take `&mut self`; a server serves one query at a time.

mod diagnostics;
mod request;

use std::time::Instant;

use log::{debug, info};

use crate::config::DrishtiConfig;
use crate::core::{GridIndex, LabeledPointCloud, Pose6D};
use crate::error::{GainError, Result};
use crate::gain::{GainEvaluator, QueryScratch, VolumetricGain};
use crate::interest::{DiffusionConfig, DiffusionStats, InterestDiffuser, SeedLabeler, SeedReport};
use crate::map::{
    DEFAULT_VOXELS_PER_SIDE, IntegrationResult, IntegratorConfig, TsdfIntegrator, TsdfLayer,
    VoxelMap,
};
use crate::motion::{PrimitiveLibrary, PrimitiveLibraryConfig};
use crate::sensor::{FrustumConfig, SeedFilterConfig};

pub use diagnostics::{DiagnosticsSink, ViewingRecord, WriterSink};
pub use request::InfoGainRequest;

/// Runtime configuration for [`GainServer`].
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Voxel edge length (meters).
    pub voxel_size: f32,
    /// Voxels per block edge.
    pub voxels_per_side: usize,
    /// Map integration.
    pub integrator: IntegratorConfig,
    /// Camera model.
    pub frustum: FrustumConfig,
    /// Salience spreading.
    pub diffusion: DiffusionConfig,
    /// Seed point filtering.
    pub seed_filter: SeedFilterConfig,
    /// Motion-primitive library.
    pub library: PrimitiveLibraryConfig,
    /// First library timestep scored by the baseline query.
    pub eval_offset: usize,
    /// Timesteps between scored library samples.
    pub eval_stride: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            voxel_size: 0.1,
            voxels_per_side: DEFAULT_VOXELS_PER_SIDE,
            integrator: IntegratorConfig::default(),
            frustum: FrustumConfig::default(),
            diffusion: DiffusionConfig::default(),
            seed_filter: SeedFilterConfig::default(),
            library: PrimitiveLibraryConfig::default(),
            eval_offset: 2,
            eval_stride: 4,
        }
    }
}

/// Result of a persistent insertion.
#[derive(Clone, Debug, Default)]
pub struct InsertReport {
    /// Map update statistics.
    pub integration: IntegrationResult,
    /// Seeding outcome.
    pub seeds: SeedReport,
}

/// Information gain server.
#[derive(Clone, Debug)]
pub struct GainServer {
    map: TsdfLayer,
    integrator: TsdfIntegrator,
    labeler: SeedLabeler,
    diffuser: InterestDiffuser,
    evaluator: GainEvaluator,
    library: PrimitiveLibrary,
    eval_offset: usize,
    eval_stride: usize,
    scratch: QueryScratch,
    /// Seeds waiting for the next diffusion walk.
    pending_seeds: Vec<GridIndex>,
    /// Seeds from persistent insertion, drained by the diagnostics export.
    tracked_seeds: Vec<GridIndex>,
}

impl GainServer {
    /// Create a server with an empty map. Builds the motion-primitive library.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            map: TsdfLayer::with_block_size(config.voxel_size, config.voxels_per_side),
            integrator: TsdfIntegrator::new(config.integrator),
            labeler: SeedLabeler::new(config.seed_filter),
            diffuser: InterestDiffuser::new(config.diffusion),
            evaluator: GainEvaluator::new(config.frustum),
            library: PrimitiveLibrary::build(config.library),
            eval_offset: config.eval_offset,
            eval_stride: config.eval_stride.max(1),
            scratch: QueryScratch::new(),
            pending_seeds: Vec::new(),
            tracked_seeds: Vec::new(),
        }
    }

    /// Validate a loaded configuration and create a server from it.
    pub fn from_config(config: &DrishtiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.to_server_config()))
    }

    /// Integrate a labeled cloud captured at `sensor_pose` into the map.
    pub fn integrate(
        &mut self,
        cloud: &LabeledPointCloud,
        sensor_pose: &Pose6D,
    ) -> Result<IntegrationResult> {
        cloud.validate()?;
        Ok(self.integrator.integrate(&mut self.map, cloud, sensor_pose))
    }

    /// Seed salient voxels hit by the cloud. Seeds wait for [`diffuse`](Self::diffuse).
    pub fn label_seeds(
        &mut self,
        cloud: &LabeledPointCloud,
        sensor_pose: &Pose6D,
    ) -> Result<SeedReport> {
        cloud.validate()?;
        Ok(self.label(cloud, sensor_pose, false))
    }

    fn label(
        &mut self,
        cloud: &LabeledPointCloud,
        sensor_pose: &Pose6D,
        record_viewing_dist: bool,
    ) -> SeedReport {
        let report = self.labeler.label(
            &mut self.map,
            &mut self.scratch,
            cloud,
            sensor_pose,
            record_viewing_dist,
        );
        self.pending_seeds.extend_from_slice(&report.seeds);
        report
    }

    /// Spread interestingness from pending seeds. Does nothing when the
    /// configured hop bound is zero.
    pub fn diffuse(&mut self) -> DiffusionStats {
        let seeds = std::mem::take(&mut self.pending_seeds);
        if self.diffuser.config().max_distance == 0 {
            return DiffusionStats::default();
        }
        self.diffuser.diffuse(&mut self.map, &mut self.scratch, seeds)
    }

    /// Gain of one candidate pose against the current map.
    ///
    /// Observed marks are cleared afterwards, so repeated calls agree.
    pub fn evaluate_gain(&mut self, pose: &Pose6D) -> f32 {
        let gain = self.evaluator.evaluate(&self.map, pose, &mut self.scratch);
        self.scratch.clear_observed();
        gain
    }

    /// Details of the latest evaluation.
    pub fn last_gain(&self) -> &VolumetricGain {
        self.evaluator.accumulator()
    }

    /// Summed gain of each library primitive placed at `robot_pose`.
    ///
    /// Scores timesteps `offset, offset + stride, ...` of every primitive with
    /// the camera level and heading `robot yaw + primitive yaw`.
    pub fn evaluate_library(&mut self, robot_pose: &Pose6D) -> Vec<f32> {
        let placed = self.library.transformed(robot_pose);
        let mut gains = Vec::with_capacity(placed.len());

        for primitive in placed.iter() {
            let mut total = 0.0;
            for state in primitive
                .states
                .iter()
                .skip(self.eval_offset)
                .step_by(self.eval_stride)
            {
                total += self.evaluate_gain(&state.pose());
            }
            gains.push(total);
        }
        gains
    }

    /// Forget observed and queued marks and pending seeds.
    pub fn reset_query_state(&mut self) {
        self.scratch.clear();
        self.pending_seeds.clear();
    }

    /// Single-shot request: integrate, seed, diffuse, score every pose, then
    /// clear the map.
    ///
    /// The request is validated before anything is touched; a malformed
    /// request leaves the server unchanged.
    pub fn calc_info_gain(&mut self, request: &InfoGainRequest) -> Result<Vec<f32>> {
        let poses = request.validate()?;
        let start = Instant::now();

        let gains = self.run_single_shot(request, &poses);
        self.clear();

        info!(
            "[GainServer] scored {} poses from {} points in {:.1} ms",
            poses.len(),
            request.cloud.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(gains)
    }

    fn run_single_shot(&mut self, request: &InfoGainRequest, poses: &[Pose6D]) -> Vec<f32> {
        self.integrator
            .integrate(&mut self.map, &request.cloud, &request.sensor_pose);
        self.label(&request.cloud, &request.sensor_pose, false);
        self.diffuse();

        poses.iter().map(|pose| self.evaluate_gain(pose)).collect()
    }

    /// Score the motion-primitive library from a `[x, y, z, roll, pitch, yaw]`
    /// robot pose. One gain per primitive, in library order.
    pub fn baseline_info_gain(&mut self, robot_pose: &[f32]) -> Result<Vec<f32>> {
        let pose = Pose6D::from_slice(robot_pose).ok_or(GainError::MalformedRobotPose {
            len: robot_pose.len(),
        })?;
        let start = Instant::now();
        let gains = self.evaluate_library(&pose);

        debug!(
            "[GainServer] baseline over {} primitives in {:.1} ms",
            gains.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(gains)
    }

    /// Integrate into the persistent map and seed salient voxels, recording
    /// the shortest viewing range of each.
    pub fn insert_pointcloud_with_interestingness(
        &mut self,
        cloud: &LabeledPointCloud,
        sensor_pose: &Pose6D,
    ) -> Result<InsertReport> {
        cloud.validate()?;
        let start = Instant::now();

        debug!("[GainServer] integrating {} points", cloud.len());
        let integration = self.integrator.integrate(&mut self.map, cloud, sensor_pose);
        let seeds = self.label(cloud, sensor_pose, true);
        self.tracked_seeds.extend_from_slice(&seeds.seeds);

        info!(
            "[GainServer] integrated {} points in {:.1} ms, {} voxels allocated, {} new seeds",
            cloud.len(),
            start.elapsed().as_secs_f64() * 1000.0,
            self.map.len(),
            seeds.seeds.len()
        );
        Ok(InsertReport { integration, seeds })
    }

    /// Report viewing statistics for every tracked seed and forget them.
    ///
    /// Returns the number of records written.
    pub fn export_viewing_diagnostics(
        &mut self,
        sink: &mut dyn DiagnosticsSink,
    ) -> std::io::Result<usize> {
        let mut written = 0;
        for index in std::mem::take(&mut self.tracked_seeds) {
            let Some(voxel) = self.map.voxel(&index) else {
                continue;
            };
            sink.record(&ViewingRecord {
                index,
                interestingness: voxel.interestingness,
                interesting_weight: voxel.interesting_weight,
                viewing_dist: voxel.viewing_dist,
            })?;
            written += 1;
        }
        sink.finish()?;
        Ok(written)
    }

    /// Drop the map and every piece of query state.
    pub fn clear(&mut self) {
        self.map.clear();
        self.scratch.clear();
        self.pending_seeds.clear();
        self.tracked_seeds.clear();
    }

    /// The voxel map.
    pub fn map(&self) -> &TsdfLayer {
        &self.map
    }

    /// Mutable access to the voxel map.
    pub fn map_mut(&mut self) -> &mut TsdfLayer {
        &mut self.map
    }

    /// Transient query marks.
    pub fn scratch(&self) -> &QueryScratch {
        &self.scratch
    }

    /// The motion-primitive library.
    pub fn library(&self) -> &PrimitiveLibrary {
        &self.library
    }
}

impl Default for GainServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn small_library() -> ServerConfig {
        ServerConfig {
            library: PrimitiveLibraryConfig {
                num_vertical: 2,
                num_yaw: 3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_malformed_poses_leave_state() {
        let mut server = GainServer::new(small_library());
        server.map_mut().allocate(GridIndex::new(0, 0, 0));

        let request = InfoGainRequest::new(LabeledPointCloud::default(), vec![0.0; 5]);
        let err = server.calc_info_gain(&request).unwrap_err();
        assert_eq!(err, GainError::MalformedPoses { len: 5 });
        assert_eq!(server.map().num_blocks(), 1);
    }

    #[test]
    fn test_mismatched_cloud_rejected() {
        let mut server = GainServer::new(small_library());
        let cloud = LabeledPointCloud {
            points: vec![Vector3::new(1.0, 0.0, 0.0)],
            interestingness: vec![],
        };
        let err = server
            .insert_pointcloud_with_interestingness(&cloud, &Pose6D::identity())
            .unwrap_err();
        assert_eq!(err, GainError::MismatchedCloud { points: 1, labels: 0 });
        assert!(server.map().is_empty());
    }

    #[test]
    fn test_malformed_robot_pose() {
        let mut server = GainServer::new(small_library());
        let err = server.baseline_info_gain(&[0.0; 3]).unwrap_err();
        assert_eq!(err, GainError::MalformedRobotPose { len: 3 });
    }

    #[test]
    fn test_baseline_one_gain_per_primitive() {
        let mut server = GainServer::new(small_library());
        let gains = server.baseline_info_gain(&[0.0; 6]).unwrap();
        assert_eq!(gains.len(), 6);
        assert!(gains.iter().all(|g| *g == 0.0));
        assert!(server.scratch().is_clean());
    }

    #[test]
    fn test_single_shot_clears_map() {
        let mut server = GainServer::new(small_library());
        let cloud = LabeledPointCloud::uniform(vec![Vector3::new(1.0, 0.0, 0.0)], 0.9);
        let request = InfoGainRequest::new(cloud, vec![0.0; 6]);
        let gains = server.calc_info_gain(&request).unwrap();
        assert_eq!(gains.len(), 1);
        assert!(server.map().is_empty());
        assert!(server.scratch().is_clean());
    }
}
