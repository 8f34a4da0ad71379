//! Turning labeled points into diffusion seeds.

use log::debug;

use crate::core::{GridIndex, LabeledPointCloud, Pose6D};
use crate::gain::QueryScratch;
use crate::map::VoxelMap;
use crate::sensor::{SeedFilterConfig, filter_seed_points};

/// Outcome of a seeding pass.
#[derive(Clone, Debug, Default)]
pub struct SeedReport {
    /// Voxels newly marked as seeds, in point order.
    pub seeds: Vec<GridIndex>,
    /// Points that survived filtering
    pub candidates: usize,
    /// Candidate points whose voxel was missing or had no interestingness
    pub rejected: usize,
}

/// Maps salient points onto seed voxels.
#[derive(Clone, Debug, Default)]
pub struct SeedLabeler {
    filter: SeedFilterConfig,
}

impl SeedLabeler {
    /// Create a labeler.
    pub fn new(filter: SeedFilterConfig) -> Self {
        Self { filter }
    }

    /// Filter config in use.
    pub fn filter(&self) -> &SeedFilterConfig {
        &self.filter
    }

    /// Seed every allocated voxel hit by a filtered point whose interestingness
    /// is positive. Seeds get hop distance 0 and are marked queued.
    ///
    /// Points are given in the sensor frame at `sensor_pose`. With
    /// `record_viewing_dist`, each matching voxel also keeps the shortest
    /// sensor range it was seen from.
    pub fn label<M: VoxelMap + ?Sized>(
        &self,
        map: &mut M,
        scratch: &mut QueryScratch,
        cloud: &LabeledPointCloud,
        sensor_pose: &Pose6D,
        record_viewing_dist: bool,
    ) -> SeedReport {
        let filtered = filter_seed_points(cloud, &self.filter);
        let mut report = SeedReport {
            candidates: filtered.points.len(),
            ..Default::default()
        };

        for point in &filtered.points.points {
            let index = map.index_of(&sensor_pose.transform_point(point));
            let Some(voxel) = map.voxel_mut(&index) else {
                report.rejected += 1;
                continue;
            };
            if voxel.interestingness <= 0.0 {
                report.rejected += 1;
                continue;
            }

            if scratch.mark_queued(index) {
                voxel.interesting_distance = 0;
                report.seeds.push(index);
            }
            if record_viewing_dist {
                voxel.viewing_dist = voxel.viewing_dist.min(point.norm());
            }
        }

        debug!(
            "[Seeding] {} points -> {} candidates -> {} seeds ({} rejected)",
            cloud.len(),
            report.candidates,
            report.seeds.len(),
            report.rejected
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Voxel;
    use crate::map::TsdfLayer;
    use nalgebra::Vector3;

    fn salient_layer() -> TsdfLayer {
        let mut layer = TsdfLayer::new(0.1);
        layer.insert(
            GridIndex::new(10, 0, 0),
            Voxel {
                weight: 1.0,
                interestingness: 0.9,
                interesting_distance: 7,
                ..Default::default()
            },
        );
        layer.insert(GridIndex::new(20, 0, 0), Voxel::default());
        layer
    }

    #[test]
    fn test_seeds_salient_voxels_once() {
        let mut layer = salient_layer();
        let mut scratch = QueryScratch::new();
        let cloud = LabeledPointCloud::uniform(
            vec![Vector3::new(1.01, 0.01, 0.01), Vector3::new(1.09, 0.09, 0.01)],
            0.8,
        );

        let report = SeedLabeler::default().label(
            &mut layer,
            &mut scratch,
            &cloud,
            &Pose6D::identity(),
            false,
        );
        // Both points land in different 5 cm leaves but the same voxel
        assert_eq!(report.candidates, 2);
        assert_eq!(report.seeds, vec![GridIndex::new(10, 0, 0)]);
        assert!(scratch.in_queue(&GridIndex::new(10, 0, 0)));
        assert_eq!(layer.voxel(&GridIndex::new(10, 0, 0)).unwrap().interesting_distance, 0);
    }

    #[test]
    fn test_rejects_missing_and_dull_voxels() {
        let mut layer = salient_layer();
        let mut scratch = QueryScratch::new();
        let cloud = LabeledPointCloud::uniform(
            vec![Vector3::new(2.01, 0.01, 0.01), Vector3::new(3.01, 0.01, 0.01)],
            0.8,
        );
        let report = SeedLabeler::default().label(
            &mut layer,
            &mut scratch,
            &cloud,
            &Pose6D::identity(),
            false,
        );
        assert!(report.seeds.is_empty());
        assert_eq!(report.rejected, 2);
        assert!(scratch.is_clean());
    }

    #[test]
    fn test_low_labels_filtered() {
        let mut layer = salient_layer();
        let mut scratch = QueryScratch::new();
        let cloud = LabeledPointCloud::uniform(vec![Vector3::new(1.01, 0.01, 0.01)], 0.3);
        let report = SeedLabeler::default().label(
            &mut layer,
            &mut scratch,
            &cloud,
            &Pose6D::identity(),
            false,
        );
        assert_eq!(report.candidates, 0);
        assert!(report.seeds.is_empty());
    }

    #[test]
    fn test_records_viewing_distance() {
        let mut layer = salient_layer();
        let mut scratch = QueryScratch::new();
        let pose = Pose6D::new(0.5, 0.0, 0.0, 0.0, 0.0, 0.0);
        let cloud = LabeledPointCloud::uniform(vec![Vector3::new(0.55, 0.05, 0.05)], 1.0);

        SeedLabeler::default().label(&mut layer, &mut scratch, &cloud, &pose, true);
        let dist = layer.voxel(&GridIndex::new(10, 0, 0)).unwrap().viewing_dist;
        assert!((dist - Vector3::new(0.55f32, 0.05, 0.05).norm()).abs() < 1e-4);
    }
}
