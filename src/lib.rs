#![warn(missing_docs)]

//! # Asteroid Terrain
//!
//! A chunked voxel terrain engine for deformable asteroids, built around a
//! marching-cubes isosurface extractor.
//!
//! A dense density/material field is generated once per asteroid, partitioned
//! into fixed-size chunks that share one layer of boundary samples with their
//! neighbors, and converted into triangle meshes chunk by chunk. Runtime edits
//! modify local density values, write every duplicated copy of an affected
//! boundary voxel, and mark the touched chunks dirty so that only those are
//! re-meshed on the next update tick.
//!
//! ## Key Modules
//!
//! * `voxels` - The voxel field data model: samples, chunks, the world grid,
//!   and the asteroid density providers
//! * `meshing` - The marching-cubes mesher, its lookup tables, and the mesh
//!   output type
//! * `editing` - The terrain editor that translates a world-space edit into
//!   density deltas across all affected chunks
//! * `core` - Shared resource containers
//!
//! ## Architecture
//!
//! The engine is frame driven and synchronous: edits only set dirty flags,
//! and [`voxels::world::World::process_dirty_chunks`] performs the wholesale
//! re-mesh of every flagged chunk. Chunks are independently re-meshable; each
//! one lives in a [`core::MtResource`] so distinct dirty chunks may be
//! regenerated from worker threads while the world serializes cross-chunk
//! writes.

use cgmath::Point3;
use log::info;

use editing::terrain_editor::TerrainEditor;
use voxels::world::{World, WorldConfig};

pub mod core;
pub mod editing;
pub mod meshing;
pub mod voxels;

/// Builds a demo asteroid, meshes it, applies one carve edit, and re-meshes
/// the dirty chunks, logging statistics along the way.
///
/// An optional command line argument names a JSON [`WorldConfig`] file;
/// without it a default configuration with a random seed is used.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be read or parsed, or if
/// the world cannot be built from it.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            let config: WorldConfig = serde_json::from_str(&text)?;
            info!("Loaded world config from {}", path);
            config
        }
        None => WorldConfig::default(),
    };

    let mut world = World::build_grid(config)?;

    let meshed = world.process_dirty_chunks();
    info!(
        "Initial build: {} chunks meshed, {} triangles total",
        meshed,
        world.triangle_count()
    );

    let boundary = world.boundary();
    let center = Point3::new(
        boundary.x as f32 / 2.0,
        boundary.y as f32 / 2.0,
        boundary.z as f32 / 2.0,
    );
    let editor = TerrainEditor::new();
    editor.apply_edit(&mut world, center, false, 2.0, 2.0);

    let remeshed = world.process_dirty_chunks();
    info!(
        "After carve at {:?}: {} chunks re-meshed, {} triangles total",
        center,
        remeshed,
        world.triangle_count()
    );

    let materials = world.material_volume();
    info!("Material volume rebuilt: {} voxels", materials.len());

    Ok(())
}
