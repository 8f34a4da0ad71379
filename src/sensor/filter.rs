//! Seed extraction from labeled clouds.
//!
//! Two stages, applied in order:
//! 1. Pass-band on the interestingness label (`[min, max]`, inclusive)
//! 2. Voxel-grid downsample, keeping the centroid and mean label per leaf

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::core::{GridIndex, LabeledPointCloud};

/// Seed filter parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SeedFilterConfig {
    /// Lowest label kept.
    pub min_intensity: f32,
    /// Highest label kept.
    pub max_intensity: f32,
    /// Downsample leaf edge (meters). Non-positive disables downsampling.
    pub leaf_size: f32,
}

impl Default for SeedFilterConfig {
    fn default() -> Self {
        Self {
            min_intensity: 0.5,
            max_intensity: 1.0,
            leaf_size: 0.05,
        }
    }
}

/// Output of [`filter_seed_points`].
#[derive(Clone, Debug, Default)]
pub struct SeedFilterResult {
    /// Surviving points with their labels.
    pub points: LabeledPointCloud,
    /// Points outside the label pass-band
    pub removed_by_intensity: usize,
    /// Points merged away by downsampling
    pub removed_by_downsampling: usize,
}

/// Label accumulator: (sum_x, sum_y, sum_z, sum_label, count)
type LeafAccum = (f64, f64, f64, f64, usize);

/// Filter a labeled cloud down to seed candidates.
pub fn filter_seed_points(cloud: &LabeledPointCloud, config: &SeedFilterConfig) -> SeedFilterResult {
    let mut passed = LabeledPointCloud::default();
    let mut removed_by_intensity = 0usize;

    for (point, label) in cloud.iter() {
        if !(config.min_intensity..=config.max_intensity).contains(&label) {
            removed_by_intensity += 1;
            continue;
        }
        passed.push(*point, label);
    }

    let before = passed.len();
    let points = if config.leaf_size > 0.0 {
        voxel_downsample(&passed, config.leaf_size)
    } else {
        passed
    };
    let removed_by_downsampling = before - points.len();

    debug_assert_eq!(
        cloud.len(),
        points.len() + removed_by_intensity + removed_by_downsampling
    );

    SeedFilterResult {
        points,
        removed_by_intensity,
        removed_by_downsampling,
    }
}

/// Keep one centroid per leaf, in order of first appearance.
fn voxel_downsample(cloud: &LabeledPointCloud, leaf_size: f32) -> LabeledPointCloud {
    let inv_leaf = 1.0 / leaf_size;
    let mut slots: HashMap<GridIndex, usize> = HashMap::new();
    let mut leaves: Vec<LeafAccum> = Vec::new();

    for (p, label) in cloud.iter() {
        let key = GridIndex::from_point(p, inv_leaf);
        let slot = *slots.entry(key).or_insert_with(|| {
            leaves.push((0.0, 0.0, 0.0, 0.0, 0));
            leaves.len() - 1
        });
        let entry = &mut leaves[slot];
        entry.0 += p.x as f64;
        entry.1 += p.y as f64;
        entry.2 += p.z as f64;
        entry.3 += label as f64;
        entry.4 += 1;
    }

    let mut out = LabeledPointCloud::default();
    for (sx, sy, sz, sl, count) in leaves {
        let n = count as f64;
        out.push(
            Vector3::new((sx / n) as f32, (sy / n) as f32, (sz / n) as f32),
            (sl / n) as f32,
        );
    }
    out
}
