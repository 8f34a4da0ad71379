//! 3-D voxel traversal for gain evaluation and integration.
//!
//! Walks every voxel a segment passes through, in order, using the
//! Amanatides-Woo grid traversal:
//!
//! ```text
//!  z/y
//!   │        ┌──┬──┐
//!   │     ┌──┼──●end
//!   │  ┌──┼──┼──┘
//!   │  ●──┼──┘
//!   │start
//!   └──────────────── x
//! ```
//!
//! Each step crosses exactly one voxel face, so a segment visits
//! `manhattan(start, end) + 1` voxels. The step count bounds the walk, which
//! keeps it finite even when floating point ties pick an unexpected axis.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use drishti::map::VoxelRay;
//!
//! for index in VoxelRay::new(&origin, &endpoint, 1.0 / voxel_size) {
//!     // classify or update the voxel
//! }
//! ```

use nalgebra::Vector3;

use crate::core::GridIndex;

/// Ordered iterator over the voxels intersected by a segment.
#[derive(Clone, Debug)]
pub struct VoxelRay {
    current: [i32; 3],
    step: [i32; 3],
    t_max: [f32; 3],
    t_delta: [f32; 3],
    remaining: usize,
    done: bool,
}

impl VoxelRay {
    /// Traverse from `start` to `end` (world coordinates).
    ///
    /// A non-finite input yields an empty ray.
    pub fn new(start: &Vector3<f32>, end: &Vector3<f32>, inv_voxel_size: f32) -> Self {
        let start_scaled = start * inv_voxel_size;
        let end_scaled = end * inv_voxel_size;

        let finite = start_scaled.iter().chain(end_scaled.iter()).all(|v| v.is_finite());
        if !finite {
            return Self::empty();
        }

        let mut current = [0i32; 3];
        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];
        let mut remaining = 0usize;

        for axis in 0..3 {
            let s = start_scaled[axis];
            let e = end_scaled[axis];
            let cell = s.floor();
            let end_cell = e.floor() as i32;
            current[axis] = cell as i32;
            remaining += (end_cell - current[axis]).unsigned_abs() as usize;

            let d = e - s;
            if d > 0.0 {
                step[axis] = 1;
                t_max[axis] = (cell + 1.0 - s) / d;
                t_delta[axis] = 1.0 / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_max[axis] = (s - cell) / -d;
                t_delta[axis] = 1.0 / -d;
            }
        }

        Self {
            current,
            step,
            t_max,
            t_delta,
            remaining,
            done: false,
        }
    }

    fn empty() -> Self {
        Self {
            current: [0; 3],
            step: [0; 3],
            t_max: [f32::INFINITY; 3],
            t_delta: [f32::INFINITY; 3],
            remaining: 0,
            done: true,
        }
    }

    /// Axis whose next face crossing is closest.
    fn next_axis(&self) -> usize {
        let mut axis = 0;
        for candidate in 1..3 {
            if self.t_max[candidate] < self.t_max[axis] {
                axis = candidate;
            }
        }
        axis
    }
}

impl Iterator for VoxelRay {
    type Item = GridIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = GridIndex::new(self.current[0], self.current[1], self.current[2]);

        if self.remaining == 0 {
            self.done = true;
            return Some(result);
        }

        let axis = self.next_axis();
        self.current[axis] += self.step[axis];
        self.t_max[axis] += self.t_delta[axis];
        self.remaining -= 1;

        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (self.remaining + 1, Some(self.remaining + 1))
        }
    }
}

impl ExactSizeIterator for VoxelRay {}
