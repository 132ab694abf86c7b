//! # Editing Module
//!
//! Runtime terrain deformation.
//!
//! * `terrain_editor` - Translates a world-space add or carve into density
//!   deltas across every affected voxel and chunk
//! * `falloff` - The strength curve applied over the edit radius

pub mod falloff;
pub mod terrain_editor;
