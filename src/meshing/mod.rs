//! # Meshing Module
//!
//! Marching-cubes isosurface extraction for chunk voxel fields.
//!
//! * `tables` - The fixed cube-corner ordering and the precomputed 256-entry
//!   edge and triangulation tables
//! * `marching_cubes` - The extractor that turns a chunk's samples into a
//!   triangle mesh at a given isolevel
//! * `mesh` - The triangle-soup output consumed by renderers and colliders

pub mod marching_cubes;
pub mod mesh;
pub mod tables;
