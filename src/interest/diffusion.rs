//! Breadth-first spreading of interestingness into unexplored space.
//!
//! Starting from seed voxels (hop distance 0), salience flows into
//! neighboring voxels that have never been observed:
//!
//! ```text
//!   d=2  d=1  d=0  d=1  d=2
//!   ░░░  ▒▒▒  ███  ▒▒▒  ░░░      value(d) = lambda * value(parent at d-1)
//!   0.25 0.5  1.0  0.5  0.25     (lambda = 0.5)
//! ```
//!
//! Observed voxels (free or occupied) and unallocated voxels block the flow.
//! A voxel is enqueued only while its hop distance is below `max_distance`,
//! so the walk stops one ring past the last enqueued voxel. Queued marks are
//! never cleared during a walk, which bounds every voxel to one enqueue.

use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Connectivity, GridIndex};
use crate::gain::QueryScratch;
use crate::map::VoxelMap;

/// Diffusion parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffusionConfig {
    /// Per-hop multiplicative decay.
    pub decay_lambda: f32,
    /// Hop count bound. Zero disables diffusion.
    pub max_distance: u32,
    /// Neighborhood walked from each voxel.
    pub connectivity: Connectivity,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            decay_lambda: 1.0,
            max_distance: 5,
            connectivity: Connectivity::Six,
        }
    }
}

/// Statistics from one diffusion walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffusionStats {
    /// Voxels popped from the queue
    pub processed: usize,
    /// Neighbors whose distance and interestingness were rewritten
    pub updated: usize,
    /// Neighbors pushed onto the queue
    pub enqueued: usize,
}

/// Spreads interestingness from seeds through unknown voxels.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterestDiffuser {
    config: DiffusionConfig,
}

impl InterestDiffuser {
    /// Create a diffuser.
    pub fn new(config: DiffusionConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &DiffusionConfig {
        &self.config
    }

    /// Run the walk from `seeds`, which must already be marked queued.
    pub fn diffuse<M: VoxelMap + ?Sized>(
        &self,
        map: &mut M,
        scratch: &mut QueryScratch,
        seeds: impl IntoIterator<Item = GridIndex>,
    ) -> DiffusionStats {
        let mut queue: VecDeque<GridIndex> = seeds.into_iter().collect();
        let mut stats = DiffusionStats::default();
        let decay = self.config.decay_lambda;
        let bound = self.config.max_distance;

        while let Some(index) = queue.pop_front() {
            stats.processed += 1;

            let Some(parent) = map.voxel(&index).copied() else {
                continue;
            };
            let hop = parent.interesting_distance.saturating_add(1);

            for neighbor in index.neighbors(self.config.connectivity) {
                let Some(voxel) = map.voxel_mut(&neighbor) else {
                    continue;
                };
                if !voxel.is_unknown() {
                    continue;
                }

                if voxel.interesting_distance > hop {
                    voxel.interesting_distance = hop;
                    voxel.interestingness = decay * parent.interestingness;
                    stats.updated += 1;
                }

                if voxel.interesting_distance < bound && scratch.mark_queued(neighbor) {
                    queue.push_back(neighbor);
                    stats.enqueued += 1;
                }
            }
        }

        debug!(
            "[Diffusion] processed {}, updated {}, enqueued {}",
            stats.processed, stats.updated, stats.enqueued
        );
        stats
    }
}
