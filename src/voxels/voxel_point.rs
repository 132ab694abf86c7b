//! A single sample of the voxel field.

use cgmath::Point3;

/// One density/material sample of a chunk's voxel field.
///
/// Density ranges over `[0, 1]`: `0.0` is fully empty space and `1.0` fully
/// solid rock; values near the isolevel define the surface boundary. The
/// material id identifies the dominant material at this sample and is left
/// untouched by density-only writes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VoxelPoint {
    /// Position of this sample within its owning chunk, in `0..=chunk_size`.
    pub local_position: Point3<i32>,
    /// Density in `[0, 1]`.
    pub density: f32,
    /// Dominant material id at this sample.
    pub material_id: i32,
}

impl VoxelPoint {
    /// Creates a new voxel sample.
    pub fn new(local_position: Point3<i32>, density: f32, material_id: i32) -> Self {
        VoxelPoint {
            local_position,
            density,
            material_id,
        }
    }
}
