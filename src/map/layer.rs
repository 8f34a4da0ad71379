//! Sparse voxel storage and the map access seam.
//!
//! Gain evaluation only needs lookups, raycasts and the voxel size, so it is
//! written against [`VoxelMap`]. [`TsdfLayer`] is the in-memory
//! implementation used by the query server.
//!
//! ## Memory Layout
//!
//! Voxels live in cubic blocks of `voxels_per_side^3`, allocated whole the
//! first time any voxel inside is touched:
//!
//! ```text
//! block index = floor(voxel index / voxels_per_side)
//!
//!  ┌────────┬────────┐
//!  │ block  │ block  │   touched voxel ■ allocates its whole block;
//!  │ (0,0)  │ (1,0) ■│   the other voxels start Unknown (weight 0)
//!  └────────┴────────┘
//! ```
//!
//! Allocated-but-unobserved voxels are what interestingness diffuses into.
//! A missing block reads as `None`, which is also Unknown.

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::core::{GridIndex, Voxel};

use super::raycaster::VoxelRay;

/// Default block edge in voxels.
pub const DEFAULT_VOXELS_PER_SIDE: usize = 16;

/// Read/write access to a voxel map.
pub trait VoxelMap {
    /// Voxel edge length in meters.
    fn voxel_size(&self) -> f32;

    /// Look up an allocated voxel.
    fn voxel(&self, index: &GridIndex) -> Option<&Voxel>;

    /// Mutable lookup of an allocated voxel.
    fn voxel_mut(&mut self, index: &GridIndex) -> Option<&mut Voxel>;

    /// Voxels intersected by the segment `origin -> endpoint`, in order.
    fn raycast(&self, origin: &Vector3<f32>, endpoint: &Vector3<f32>) -> VoxelRay {
        VoxelRay::new(origin, endpoint, 1.0 / self.voxel_size())
    }

    /// Grid index containing a world point.
    fn index_of(&self, point: &Vector3<f32>) -> GridIndex {
        GridIndex::from_point(point, 1.0 / self.voxel_size())
    }
}

#[derive(Clone, Debug)]
struct VoxelBlock {
    voxels: Vec<Voxel>,
}

/// Block-sparse voxel layer.
#[derive(Clone, Debug)]
pub struct TsdfLayer {
    blocks: HashMap<GridIndex, VoxelBlock>,
    voxel_size: f32,
    /// Pre-computed 1.0 / voxel_size.
    inv_voxel_size: f32,
    voxels_per_side: i32,
}

impl TsdfLayer {
    /// Create an empty layer with the default block size.
    pub fn new(voxel_size: f32) -> Self {
        Self::with_block_size(voxel_size, DEFAULT_VOXELS_PER_SIDE)
    }

    /// Create an empty layer with `voxels_per_side` voxels per block edge.
    ///
    /// A block size of 1 allocates voxels individually.
    pub fn with_block_size(voxel_size: f32, voxels_per_side: usize) -> Self {
        Self {
            blocks: HashMap::new(),
            voxel_size,
            inv_voxel_size: 1.0 / voxel_size,
            voxels_per_side: voxels_per_side.max(1) as i32,
        }
    }

    /// Block key and linear offset of a voxel.
    #[inline]
    fn locate(&self, index: &GridIndex) -> (GridIndex, usize) {
        let n = self.voxels_per_side;
        let block = GridIndex::new(index.x.div_euclid(n), index.y.div_euclid(n), index.z.div_euclid(n));
        let lx = index.x.rem_euclid(n) as usize;
        let ly = index.y.rem_euclid(n) as usize;
        let lz = index.z.rem_euclid(n) as usize;
        let n = n as usize;
        (block, lx + n * (ly + n * lz))
    }

    /// Get a voxel, allocating its block if needed.
    pub fn allocate(&mut self, index: GridIndex) -> &mut Voxel {
        let (block, offset) = self.locate(&index);
        let per_block = self.voxels_per_block();
        let block = self.blocks.entry(block).or_insert_with(|| VoxelBlock {
            voxels: vec![Voxel::default(); per_block],
        });
        &mut block.voxels[offset]
    }

    /// Overwrite a voxel, allocating its block if needed.
    pub fn insert(&mut self, index: GridIndex, voxel: Voxel) {
        *self.allocate(index) = voxel;
    }

    /// Number of allocated voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len() * self.voxels_per_block()
    }

    /// True if nothing is allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of allocated blocks.
    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Voxels per block.
    #[inline]
    pub fn voxels_per_block(&self) -> usize {
        (self.voxels_per_side as usize).pow(3)
    }

    /// Drop every block.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Iterate allocated voxels.
    pub fn iter(&self) -> impl Iterator<Item = (GridIndex, &Voxel)> {
        let n = self.voxels_per_side;
        self.blocks.iter().flat_map(move |(block, data)| {
            data.voxels.iter().enumerate().map(move |(offset, voxel)| {
                let offset = offset as i32;
                let local = GridIndex::new(offset % n, (offset / n) % n, offset / (n * n));
                let base = GridIndex::new(block.x * n, block.y * n, block.z * n);
                (base + local, voxel)
            })
        })
    }

    /// Pre-computed inverse voxel size.
    #[inline]
    pub fn inv_voxel_size(&self) -> f32 {
        self.inv_voxel_size
    }
}

impl VoxelMap for TsdfLayer {
    #[inline]
    fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    #[inline]
    fn voxel(&self, index: &GridIndex) -> Option<&Voxel> {
        let (block, offset) = self.locate(index);
        self.blocks.get(&block).map(|b| &b.voxels[offset])
    }

    #[inline]
    fn voxel_mut(&mut self, index: &GridIndex) -> Option<&mut Voxel> {
        let (block, offset) = self.locate(index);
        self.blocks.get_mut(&block).map(|b| &mut b.voxels[offset])
    }

    fn raycast(&self, origin: &Vector3<f32>, endpoint: &Vector3<f32>) -> VoxelRay {
        VoxelRay::new(origin, endpoint, self.inv_voxel_size)
    }

    fn index_of(&self, point: &Vector3<f32>) -> GridIndex {
        GridIndex::from_point(point, self.inv_voxel_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unallocated_lookup() {
        let layer = TsdfLayer::new(0.1);
        assert!(layer.voxel(&GridIndex::new(0, 0, 0)).is_none());
        assert!(layer.is_empty());
    }

    #[test]
    fn test_allocate_fills_block() {
        let mut layer = TsdfLayer::with_block_size(0.1, 4);
        layer.allocate(GridIndex::new(1, 2, 3)).weight = 2.0;
        assert_eq!(layer.num_blocks(), 1);
        assert_eq!(layer.len(), 64);
        assert_eq!(layer.voxel(&GridIndex::new(1, 2, 3)).map(|v| v.weight), Some(2.0));

        // Same block, untouched voxel is allocated but unknown
        let sibling = layer.voxel(&GridIndex::new(0, 0, 0)).unwrap();
        assert!(sibling.is_unknown());
        assert!(layer.voxel(&GridIndex::new(4, 0, 0)).is_none());

        layer.clear();
        assert!(layer.is_empty());
    }

    #[test]
    fn test_negative_indices() {
        let mut layer = TsdfLayer::with_block_size(0.1, 4);
        layer.allocate(GridIndex::new(-1, -5, 0)).distance = 0.3;
        assert_eq!(layer.voxel(&GridIndex::new(-1, -5, 0)).map(|v| v.distance), Some(0.3));
        assert!(layer.voxel(&GridIndex::new(-4, -8, 3)).is_some());
        assert!(layer.voxel(&GridIndex::new(0, -5, 0)).is_none());
    }

    #[test]
    fn test_iter_recovers_indices() {
        let mut layer = TsdfLayer::with_block_size(0.1, 2);
        layer.allocate(GridIndex::new(-3, 1, 5)).weight = 1.0;
        let mut found: Vec<GridIndex> = layer.iter().map(|(i, _)| i).collect();
        found.sort();
        assert_eq!(found.len(), 8);
        assert_eq!(found.first(), Some(&GridIndex::new(-4, 0, 4)));
        assert_eq!(found.last(), Some(&GridIndex::new(-3, 1, 5)));

        let observed: Vec<GridIndex> = layer
            .iter()
            .filter(|(_, v)| !v.is_unknown())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(observed, vec![GridIndex::new(-3, 1, 5)]);
    }

    #[test]
    fn test_index_of() {
        let layer = TsdfLayer::new(0.2);
        assert_eq!(
            layer.index_of(&Vector3::new(0.3, -0.1, 0.0)),
            GridIndex::new(1, -1, 0)
        );
    }
}
