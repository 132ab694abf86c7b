//! # World Module
//!
//! The world owns the chunk grid, the persistent raw material/density store,
//! and the cross-chunk write path that keeps duplicated boundary samples
//! consistent.
//!
//! ## Boundary Consistency
//!
//! Chunks overlap by one sample layer, so a lattice point on a chunk face,
//! edge, or corner is stored by up to 8 chunks at once. All density writes go
//! through [`World::set_density_and_propagate`], which locates every chunk
//! holding a copy of the point and updates each one. Nothing else in the
//! engine writes chunk densities directly, which is what keeps seams
//! watertight across edits.
//!
//! ## Update Tick
//!
//! Edits only flag chunks dirty. [`World::process_dirty_chunks`] performs the
//! wholesale re-mesh of every flagged chunk and clears the flags.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, info};
use num_traits::FromPrimitive;
use serde::Deserialize;
use thiserror::Error;

use crate::core::MtResource;
use crate::meshing::tables::CUBE_POINTS;
use crate::voxels::chunk::Chunk;
use crate::voxels::generation::{
    AsteroidGenerator, DensityProvider, GenerationKind, RawField,
};
use crate::voxels::voxel_point::VoxelPoint;

/// Errors from world construction and voxel access.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A voxel coordinate fell outside the world boundary.
    #[error("voxel ({x}, {y}, {z}) is outside the world boundary")]
    OutOfBounds {
        /// World-space x coordinate of the rejected voxel.
        x: i32,
        /// World-space y coordinate of the rejected voxel.
        y: i32,
        /// World-space z coordinate of the rejected voxel.
        z: i32,
    },
    /// The configured generation kind id maps to no known asteroid shape.
    #[error("unknown generation kind id {0}")]
    UnknownGenerationKind(i32),
    /// The supplied raw field holds no voxels.
    #[error("cannot build a world from an empty field")]
    EmptyField,
}

/// World construction parameters, loadable from a JSON file.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    /// Number of unit cubes per chunk axis.
    pub chunk_size: i32,
    /// Densities above this value are inside the solid.
    pub isolevel: f32,
    /// World extent along x, in chunks.
    pub world_length: i32,
    /// World extent along y, in chunks.
    pub world_width: i32,
    /// World extent along z, in chunks.
    pub world_height: i32,
    /// Numeric id of the asteroid shape, see [`GenerationKind`].
    pub generation_kind_id: i32,
    /// Seed for noise and material randomization.
    pub seed: i32,
    /// Asteroid radius in voxels.
    pub radius: i32,
    /// Width of the density gradient shell in voxels.
    pub shell_thickness: i32,
    /// Frequency applied to Perlin noise samples.
    pub noise_freq: f64,
    /// Divisor applied to voxel coordinates before noise sampling.
    pub noise_scale: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: 8,
            isolevel: 0.5,
            world_length: 4,
            world_width: 4,
            world_height: 4,
            generation_kind_id: 0,
            seed: fastrand::i32(1..10_000),
            radius: 14,
            shell_thickness: 3,
            noise_freq: 0.02,
            noise_scale: 1.0,
        }
    }
}

impl WorldConfig {
    /// Resolves the configured shape id to a [`GenerationKind`].
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownGenerationKind`] for ids with no shape.
    pub fn generation_kind(&self) -> Result<GenerationKind, WorldError> {
        GenerationKind::from_i32(self.generation_kind_id)
            .ok_or(WorldError::UnknownGenerationKind(self.generation_kind_id))
    }
}

/// The chunk grid plus the persistent raw store behind it.
pub struct World {
    config: WorldConfig,
    /// All chunks of the grid, keyed by their world-space origin.
    pub chunks: HashMap<Point3<i32>, MtResource<Chunk>>,
    raw_data: RawField,
    boundary: Point3<i32>,
}

impl World {
    /// Builds the world by generating a fresh asteroid field from the
    /// configuration and partitioning it into chunks.
    ///
    /// # Errors
    /// Returns an error when the configured generation kind id is unknown.
    pub fn build_grid(config: WorldConfig) -> Result<Self, WorldError> {
        let kind = config.generation_kind()?;
        let generator = AsteroidGenerator::new(
            config.seed,
            config.radius,
            config.shell_thickness,
            config.noise_freq,
            config.noise_scale,
        );
        // One extra voxel per axis covers the final sample layer of the last
        // chunk row.
        let field = generator.generate(
            kind,
            config.chunk_size * config.world_length + 1,
            config.chunk_size * config.world_width + 1,
            config.chunk_size * config.world_height + 1,
        );
        Self::from_field(config, field)
    }

    /// Builds the world from an already generated raw field.
    ///
    /// # Errors
    /// Returns [`WorldError::EmptyField`] when the field holds no voxels.
    pub fn from_field(config: WorldConfig, field: RawField) -> Result<Self, WorldError> {
        if field.is_empty() {
            return Err(WorldError::EmptyField);
        }

        let boundary = Point3::new(
            config.chunk_size * config.world_length,
            config.chunk_size * config.world_width,
            config.chunk_size * config.world_height,
        );

        let mut chunks = HashMap::new();
        for x in 0..config.world_length {
            for y in 0..config.world_width {
                for z in 0..config.world_height {
                    let origin = Point3::new(
                        x * config.chunk_size,
                        y * config.chunk_size,
                        z * config.chunk_size,
                    );
                    chunks.insert(
                        origin,
                        MtResource::new(Chunk::new(origin, config.chunk_size, &field)),
                    );
                }
            }
        }
        info!(
            "World grid built: {} chunks of size {}, boundary {:?}",
            chunks.len(),
            config.chunk_size,
            boundary
        );

        Ok(World {
            config,
            chunks,
            raw_data: field,
            boundary,
        })
    }

    /// The exclusive world boundary in voxels per axis.
    pub fn boundary(&self) -> Point3<i32> {
        self.boundary
    }

    /// Number of unit cubes per chunk axis.
    pub fn chunk_size(&self) -> i32 {
        self.config.chunk_size
    }

    /// The isolevel chunks mesh against.
    pub fn isolevel(&self) -> f32 {
        self.config.isolevel
    }

    /// Returns true when the voxel lies inside the world boundary.
    ///
    /// The upper bound is exclusive so that every contained voxel has an
    /// owning chunk whose origin is its floored coordinate.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && x < self.boundary.x
            && y >= 0
            && y < self.boundary.y
            && z >= 0
            && z < self.boundary.z
    }

    /// Floors a world coordinate to the origin of the chunk containing it.
    pub fn floor_to_chunk(&self, point: Point3<i32>) -> Point3<i32> {
        let size = self.config.chunk_size;
        Point3::new(
            point.x.div_euclid(size) * size,
            point.y.div_euclid(size) * size,
            point.z.div_euclid(size) * size,
        )
    }

    /// Returns the chunk at the given origin.
    ///
    /// # Errors
    /// Returns [`WorldError::OutOfBounds`] when no chunk owns that origin.
    pub fn chunk_at(&self, origin: Point3<i32>) -> Result<MtResource<Chunk>, WorldError> {
        self.chunks
            .get(&origin)
            .cloned()
            .ok_or(WorldError::OutOfBounds {
                x: origin.x,
                y: origin.y,
                z: origin.z,
            })
    }

    /// Reads the sample at the given world voxel from its owning chunk.
    ///
    /// # Errors
    /// Returns [`WorldError::OutOfBounds`] outside the world boundary.
    pub fn voxel_point(&self, x: i32, y: i32, z: i32) -> Result<VoxelPoint, WorldError> {
        if !self.contains(x, y, z) {
            return Err(WorldError::OutOfBounds { x, y, z });
        }
        let origin = self.floor_to_chunk(Point3::new(x, y, z));
        let chunk = self.chunk_at(origin)?;
        let point = chunk
            .get()
            .voxel_point(x - origin.x, y - origin.y, z - origin.z);
        Ok(point)
    }

    /// Reads the density at the given world voxel.
    ///
    /// # Errors
    /// Returns [`WorldError::OutOfBounds`] outside the world boundary.
    pub fn get_density(&self, x: i32, y: i32, z: i32) -> Result<f32, WorldError> {
        Ok(self.voxel_point(x, y, z)?.density)
    }

    /// Writes a density and propagates it to every chunk that duplicates the
    /// point, optionally flagging those chunks for re-meshing.
    ///
    /// A lattice point on a chunk face, edge, or corner is stored by up to 8
    /// chunks. The candidate owners are found by stepping one cube corner
    /// back in each direction and flooring to the chunk grid; candidates
    /// falling outside the grid (at the world edge) are skipped.
    ///
    /// # Errors
    /// Returns [`WorldError::OutOfBounds`] outside the world boundary.
    pub fn set_density_and_propagate(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        density: f32,
        mark_dirty: bool,
    ) -> Result<(), WorldError> {
        if !self.contains(x, y, z) {
            return Err(WorldError::OutOfBounds { x, y, z });
        }

        let point = Point3::new(x, y, z);
        let mut seen: [Option<Point3<i32>>; 8] = [None; 8];

        for offset in CUBE_POINTS {
            let origin = self.floor_to_chunk(Point3::new(
                point.x - offset[0],
                point.y - offset[1],
                point.z - offset[2],
            ));
            if seen.iter().flatten().any(|&o| o == origin) {
                continue;
            }
            let slot = seen.iter_mut().find(|s| s.is_none());
            if let Some(slot) = slot {
                *slot = Some(origin);
            }

            let Some(chunk) = self.chunks.get(&origin) else {
                continue;
            };
            let mut chunk = chunk.get_mut();
            let local = Point3::new(point.x - origin.x, point.y - origin.y, point.z - origin.z);
            chunk.set_density(density, local);
            if mark_dirty {
                chunk.ready_for_update = true;
            }
        }
        Ok(())
    }

    /// Re-meshes every dirty chunk wholesale and clears its flag.
    ///
    /// # Returns
    /// The number of chunks regenerated this tick.
    pub fn process_dirty_chunks(&mut self) -> usize {
        let isolevel = self.config.isolevel;
        let mut meshed = 0;
        for chunk in self.chunks.values() {
            let mut chunk = chunk.get_mut();
            if !chunk.ready_for_update {
                continue;
            }
            chunk.generate(isolevel);
            chunk.ready_for_update = false;
            meshed += 1;
            debug!("Re-meshed chunk at {:?}", chunk.position);
        }
        meshed
    }

    /// Total triangles across all chunk meshes.
    pub fn triangle_count(&self) -> usize {
        self.chunks
            .values()
            .map(|chunk| chunk.get().mesh().triangle_count())
            .sum()
    }

    /// Reads a value from the persistent raw store.
    pub fn raw_value(&self, x: i32, y: i32, z: i32) -> f32 {
        self.raw_data.get(x, y, z)
    }

    /// Writes a value into the persistent raw store.
    ///
    /// The raw store keeps the combined material/density encoding alive
    /// across edits; chunk densities are updated separately through
    /// [`World::set_density_and_propagate`].
    pub fn set_raw_value(&mut self, x: i32, y: i32, z: i32, value: f32) {
        self.raw_data.set(x, y, z, value);
    }

    /// Rebuilds the dense material id volume from the raw store.
    ///
    /// Voxels are laid out in `x + y * length + z * length * width` order and
    /// material ids are clamped into the `u8` range.
    pub fn material_volume(&self) -> Vec<u8> {
        let mut volume =
            Vec::with_capacity((self.boundary.x * self.boundary.y * self.boundary.z) as usize);
        for z in 0..self.boundary.z {
            for y in 0..self.boundary.y {
                for x in 0..self.boundary.x {
                    volume.push(self.raw_data.material_at(x, y, z).clamp(0, 255) as u8);
                }
            }
        }
        volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WorldConfig {
        WorldConfig {
            chunk_size: 4,
            isolevel: 0.5,
            world_length: 2,
            world_width: 2,
            world_height: 2,
            generation_kind_id: 0,
            seed: 7,
            radius: 3,
            shell_thickness: 1,
            noise_freq: 0.02,
            noise_scale: 1.0,
        }
    }

    fn test_world() -> World {
        let field = RawField::new(9, 9, 9);
        World::from_field(test_config(), field).unwrap()
    }

    #[test]
    fn empty_field_is_rejected() {
        let result = World::from_field(test_config(), RawField::new(0, 0, 0));
        assert!(matches!(result, Err(WorldError::EmptyField)));
    }

    #[test]
    fn unknown_generation_kind_is_rejected() {
        let mut config = test_config();
        config.generation_kind_id = 99;
        assert!(matches!(
            World::build_grid(config),
            Err(WorldError::UnknownGenerationKind(99))
        ));
    }

    #[test]
    fn grid_has_a_chunk_per_cell() {
        let world = test_world();
        assert_eq!(world.chunks.len(), 8);
        assert!(world.chunks.contains_key(&Point3::new(0, 0, 0)));
        assert!(world.chunks.contains_key(&Point3::new(4, 4, 4)));
        assert!(!world.chunks.contains_key(&Point3::new(8, 8, 8)));
    }

    #[test]
    fn contains_uses_exclusive_upper_bound() {
        let world = test_world();
        assert!(world.contains(0, 0, 0));
        assert!(world.contains(7, 7, 7));
        assert!(!world.contains(8, 0, 0));
        assert!(!world.contains(-1, 0, 0));
    }

    #[test]
    fn floor_to_chunk_maps_voxels_to_owning_origin() {
        let world = test_world();
        assert_eq!(
            world.floor_to_chunk(Point3::new(3, 5, 7)),
            Point3::new(0, 4, 4)
        );
        assert_eq!(
            world.floor_to_chunk(Point3::new(4, 4, 4)),
            Point3::new(4, 4, 4)
        );
    }

    #[test]
    fn out_of_bounds_density_read_errors() {
        let world = test_world();
        assert!(matches!(
            world.get_density(8, 0, 0),
            Err(WorldError::OutOfBounds { x: 8, y: 0, z: 0 })
        ));
    }

    #[test]
    fn corner_write_propagates_to_all_eight_chunks() {
        let mut world = test_world();
        world.process_dirty_chunks();

        // (4, 4, 4) is the shared corner of all 8 chunks in a 2x2x2 grid.
        world.set_density_and_propagate(4, 4, 4, 0.9, true).unwrap();

        for (origin, chunk) in &world.chunks {
            let chunk = chunk.get();
            let local = Point3::new(4 - origin.x, 4 - origin.y, 4 - origin.z);
            assert_eq!(
                chunk.density(local.x, local.y, local.z),
                0.9,
                "chunk at {origin:?} missed the propagated write"
            );
            assert!(chunk.ready_for_update, "chunk at {origin:?} not flagged");
        }
    }

    #[test]
    fn interior_write_touches_one_chunk() {
        let mut world = test_world();
        world.process_dirty_chunks();

        world.set_density_and_propagate(2, 2, 2, 0.7, true).unwrap();

        let dirty: Vec<_> = world
            .chunks
            .iter()
            .filter(|(_, chunk)| chunk.get().ready_for_update)
            .map(|(origin, _)| *origin)
            .collect();
        assert_eq!(dirty, vec![Point3::new(0, 0, 0)]);
    }

    #[test]
    fn process_dirty_chunks_clears_flags_and_counts() {
        let mut world = test_world();
        assert_eq!(world.process_dirty_chunks(), 8);
        assert_eq!(world.process_dirty_chunks(), 0);
    }

    #[test]
    fn material_volume_covers_the_boundary() {
        let mut world = test_world();
        world.set_raw_value(1, 0, 0, 2.25);
        let volume = world.material_volume();
        assert_eq!(volume.len(), 8 * 8 * 8);
        assert_eq!(volume[1], 2);
        assert_eq!(volume[0], 0);
    }
}
