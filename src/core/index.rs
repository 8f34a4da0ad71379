//! Voxel grid index and neighborhood enumeration.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Integer key of a voxel in the unbounded sparse grid.
///
/// The voxel covers `[index * size, (index + 1) * size)` on every axis, so its
/// center sits at `(index + 0.5) * size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridIndex {
    /// X index
    pub x: i32,
    /// Y index
    pub y: i32,
    /// Z index
    pub z: i32,
}

/// Neighborhood used when enumerating adjacent voxels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Face neighbors only
    #[default]
    Six,
    /// Face and edge neighbors
    Eighteen,
    /// Face, edge and corner neighbors
    TwentySix,
}

/// Face offsets, listed first so every neighborhood starts with them.
const FACE_OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

impl Connectivity {
    /// Number of neighbors in this neighborhood.
    pub fn neighbor_count(&self) -> usize {
        match self {
            Connectivity::Six => 6,
            Connectivity::Eighteen => 18,
            Connectivity::TwentySix => 26,
        }
    }
}

impl GridIndex {
    /// Create a new grid index
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Grid index containing a world point.
    #[inline]
    pub fn from_point(point: &Vector3<f32>, inv_voxel_size: f32) -> Self {
        Self::new(
            (point.x * inv_voxel_size).floor() as i32,
            (point.y * inv_voxel_size).floor() as i32,
            (point.z * inv_voxel_size).floor() as i32,
        )
    }

    /// Center of this voxel in world coordinates.
    #[inline]
    pub fn center(&self, voxel_size: f32) -> Vector3<f32> {
        Vector3::new(
            (self.x as f32 + 0.5) * voxel_size,
            (self.y as f32 + 0.5) * voxel_size,
            (self.z as f32 + 0.5) * voxel_size,
        )
    }

    /// Manhattan distance to another index
    #[inline]
    pub fn manhattan_distance(&self, other: &GridIndex) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// Chebyshev distance (max per-axis distance)
    #[inline]
    pub fn chebyshev_distance(&self, other: &GridIndex) -> i32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    /// Get the 6 face neighbors
    #[inline]
    pub fn neighbors_6(&self) -> [GridIndex; 6] {
        FACE_OFFSETS.map(|(dx, dy, dz)| GridIndex::new(self.x + dx, self.y + dy, self.z + dz))
    }

    /// Enumerate neighbors for the given connectivity.
    ///
    /// Face neighbors always come first, in a fixed order, so diffusion is
    /// deterministic regardless of the neighborhood size.
    pub fn neighbors(&self, connectivity: Connectivity) -> Vec<GridIndex> {
        let mut out = Vec::with_capacity(connectivity.neighbor_count());
        out.extend_from_slice(&self.neighbors_6());
        if connectivity == Connectivity::Six {
            return out;
        }

        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let nonzero = (dx != 0) as u8 + (dy != 0) as u8 + (dz != 0) as u8;
                    let wanted = match connectivity {
                        Connectivity::Eighteen => nonzero == 2,
                        _ => nonzero >= 2,
                    };
                    if wanted {
                        out.push(GridIndex::new(self.x + dx, self.y + dy, self.z + dz));
                    }
                }
            }
        }
        out
    }
}

impl Add for GridIndex {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        GridIndex::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for GridIndex {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        GridIndex::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}
