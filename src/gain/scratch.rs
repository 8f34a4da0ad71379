//! Per-query transient voxel marks.
//!
//! Observed and queued marks only live for the duration of a query, so they
//! are kept here instead of in shared voxel storage. Both sets must be empty
//! between queries.

use std::collections::HashSet;

use crate::core::GridIndex;

/// Observed and queued sets for one query.
#[derive(Clone, Debug, Default)]
pub struct QueryScratch {
    observed: HashSet<GridIndex>,
    queued: HashSet<GridIndex>,
}

impl QueryScratch {
    /// Create empty scratch state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a voxel observed. Returns `true` if it was not observed before.
    #[inline]
    pub fn mark_observed(&mut self, index: GridIndex) -> bool {
        self.observed.insert(index)
    }

    /// Whether a voxel was already counted during this evaluation.
    #[inline]
    pub fn is_observed(&self, index: &GridIndex) -> bool {
        self.observed.contains(index)
    }

    /// Mark a voxel queued for diffusion. Returns `true` if newly marked.
    #[inline]
    pub fn mark_queued(&mut self, index: GridIndex) -> bool {
        self.queued.insert(index)
    }

    /// Whether a voxel has been queued for diffusion.
    #[inline]
    pub fn in_queue(&self, index: &GridIndex) -> bool {
        self.queued.contains(index)
    }

    /// Number of observed voxels.
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Number of queued voxels.
    pub fn queued_count(&self) -> usize {
        self.queued.len()
    }

    /// Forget observed marks; queued marks are kept.
    pub fn clear_observed(&mut self) {
        self.observed.clear();
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.observed.clear();
        self.queued.clear();
    }

    /// True if no voxel is marked.
    pub fn is_clean(&self) -> bool {
        self.observed.is_empty() && self.queued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_once() {
        let mut scratch = QueryScratch::new();
        let idx = GridIndex::new(1, 1, 1);
        assert!(scratch.mark_observed(idx));
        assert!(!scratch.mark_observed(idx));
        assert!(scratch.is_observed(&idx));
    }

    #[test]
    fn test_clear_observed_keeps_queue() {
        let mut scratch = QueryScratch::new();
        scratch.mark_observed(GridIndex::new(0, 0, 0));
        scratch.mark_queued(GridIndex::new(1, 0, 0));
        scratch.clear_observed();
        assert_eq!(scratch.observed_count(), 0);
        assert!(scratch.in_queue(&GridIndex::new(1, 0, 0)));

        scratch.clear();
        assert!(scratch.is_clean());
    }
}
