//! # Voxels Module
//!
//! The voxel field data model: individual density/material samples, the
//! fixed-size chunks that own them, the world grid that maps world-space
//! coordinates onto chunk-local samples, and the asteroid density providers
//! that fill the field at build time.
//!
//! ## Boundary Consistency
//!
//! Adjacent chunks share a face of duplicated boundary samples: the sample at
//! local index `chunk_size` on one chunk's axis is the same world voxel as the
//! sample at local index `0` of the neighbor along that axis. Every write to a
//! world voxel goes through the world so that all duplicates (up to 8 chunks
//! share a corner voxel) receive the identical value. A missed duplicate shows
//! up as a visible crack along the chunk seam.

pub mod chunk;
pub mod generation;
pub mod voxel_point;
pub mod world;
