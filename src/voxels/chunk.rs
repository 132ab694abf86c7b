//! # Chunk Module
//!
//! A chunk owns a cubic block of voxel samples and the latest mesh extracted
//! from them.
//!
//! ## Sample Layout
//!
//! A chunk of size `N` covers `N` unit cubes per axis and therefore stores
//! `(N + 1)` samples per axis: the extra layer duplicates the first sample
//! layer of the neighboring chunk so that both sides of a seam read identical
//! densities. The samples are stored in a flat vector in row-major order
//! (x, then y, then z), which keeps cube-corner lookups during meshing to a
//! single multiply-add per axis.
//!
//! ## Lifecycle
//!
//! A chunk is created once at world-build time with an initial fill from the
//! density provider, mutated in place by edits, never resized, and dropped
//! only at world teardown. Edits set `ready_for_update`; the next update tick
//! replaces the mesh wholesale.

use cgmath::Point3;

use crate::meshing::{marching_cubes, mesh::Mesh};
use crate::voxels::generation::DensityProvider;
use crate::voxels::voxel_point::VoxelPoint;

/// A fixed-size cubic block of voxel samples, independently re-meshable.
pub struct Chunk {
    /// World-space origin of this chunk, a multiple of the chunk size.
    pub position: Point3<i32>,
    /// True when an edit has touched this chunk and its mesh is stale.
    pub ready_for_update: bool,
    chunk_size: i32,
    points: Vec<VoxelPoint>,
    mesh: Mesh,
}

impl Chunk {
    /// Creates a chunk at the given world origin and fills its
    /// `(chunk_size + 1)^3` samples from the density provider.
    ///
    /// The fill includes the one-sample overlap shared with neighbors, so two
    /// adjacent chunks read identical values along their common face. The new
    /// chunk starts dirty; the first update tick produces its initial mesh.
    pub fn new(position: Point3<i32>, chunk_size: i32, provider: &impl DensityProvider) -> Self {
        let dimension = chunk_size + 1;
        let mut points = Vec::with_capacity((dimension * dimension * dimension) as usize);

        // Fill order matches index(): x + dimension * y + dimension^2 * z
        for z in 0..dimension {
            for y in 0..dimension {
                for x in 0..dimension {
                    let world_x = position.x + x;
                    let world_y = position.y + y;
                    let world_z = position.z + z;
                    points.push(VoxelPoint::new(
                        Point3::new(x, y, z),
                        provider.density_at(world_x, world_y, world_z),
                        provider.material_at(world_x, world_y, world_z),
                    ));
                }
            }
        }

        Chunk {
            position,
            ready_for_update: true,
            chunk_size,
            points,
            mesh: Mesh::new(),
        }
    }

    /// The chunk size `N` (number of unit cubes per axis).
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Number of samples per axis, always `chunk_size + 1`.
    pub fn dimension(&self) -> i32 {
        self.chunk_size + 1
    }

    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        let dimension = self.dimension();
        (x + y * dimension + z * dimension * dimension) as usize
    }

    /// Returns the sample at the given local coordinates.
    ///
    /// # Panics
    /// Panics if any coordinate is outside `0..=chunk_size`; chunk-local
    /// indices are resolved by the world before they reach a chunk.
    pub fn voxel_point(&self, x: i32, y: i32, z: i32) -> VoxelPoint {
        self.points[self.index(x, y, z)]
    }

    /// Returns the density at the given local coordinates.
    pub fn density(&self, x: i32, y: i32, z: i32) -> f32 {
        self.points[self.index(x, y, z)].density
    }

    /// Overwrites the density at the given local position.
    pub fn set_density(&mut self, density: f32, local: Point3<i32>) {
        let i = self.index(local.x, local.y, local.z);
        self.points[i].density = density;
    }

    /// Overwrites the material id at the given local position.
    pub fn set_material(&mut self, material_id: i32, local: Point3<i32>) {
        let i = self.index(local.x, local.y, local.z);
        self.points[i].material_id = material_id;
    }

    /// All samples of this chunk in storage order.
    pub fn points(&self) -> &[VoxelPoint] {
        &self.points
    }

    /// Regenerates this chunk's mesh wholesale from its current samples.
    ///
    /// Vertex positions are chunk-local; consumers offset them by
    /// [`Chunk::position`]. The previous mesh is replaced, never patched.
    pub fn generate(&mut self, isolevel: f32) {
        self.mesh = marching_cubes::create_mesh(&self.points, self.chunk_size, isolevel);
    }

    /// The latest mesh extracted from this chunk.
    ///
    /// Consumers must treat it as replace-on-dirty: after an edit marks the
    /// chunk dirty, the whole mesh is regenerated on the next update tick.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::generation::RawField;

    fn uniform_field(value: f32) -> RawField {
        let mut field = RawField::new(8, 8, 8);
        for x in 0..8 {
            for y in 0..8 {
                for z in 0..8 {
                    field.set(x, y, z, value);
                }
            }
        }
        field
    }

    #[test]
    fn chunk_stores_one_extra_sample_per_axis() {
        let field = uniform_field(0.25);
        let chunk = Chunk::new(Point3::new(0, 0, 0), 4, &field);
        assert_eq!(chunk.dimension(), 5);
        assert_eq!(chunk.points().len(), 5 * 5 * 5);
    }

    #[test]
    fn chunk_samples_include_world_offset() {
        let mut field = RawField::new(8, 8, 8);
        field.set(4, 4, 4, 0.75);
        let chunk = Chunk::new(Point3::new(4, 4, 4), 4, &field);
        assert_eq!(chunk.density(0, 0, 0), 0.75);
        // Beyond the field the provider reads empty
        assert_eq!(chunk.density(4, 4, 4), 0.0);
    }

    #[test]
    fn set_density_leaves_material_untouched() {
        let mut field = RawField::new(8, 8, 8);
        field.set(1, 1, 1, 2.5);
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), 4, &field);
        assert_eq!(chunk.voxel_point(1, 1, 1).material_id, 2);

        chunk.set_density(0.1, Point3::new(1, 1, 1));
        let point = chunk.voxel_point(1, 1, 1);
        assert_eq!(point.density, 0.1);
        assert_eq!(point.material_id, 2);
    }

    #[test]
    fn new_chunk_starts_dirty_with_empty_mesh() {
        let field = uniform_field(0.0);
        let chunk = Chunk::new(Point3::new(0, 0, 0), 4, &field);
        assert!(chunk.ready_for_update);
        assert!(chunk.mesh().is_empty());
    }
}
