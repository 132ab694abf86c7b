//! # Terrain Editor Module
//!
//! Applies spherical add and carve edits to the voxel world.
//!
//! An edit sweeps the cube of voxels around its center, computes a
//! distance-attenuated density delta for every voxel inside the radius, and
//! writes the result through the world's propagating setter so that every
//! duplicated boundary sample stays consistent and the touched chunks are
//! flagged for re-meshing. The persistent raw store is updated alongside the
//! live densities to keep material ids attached to solid voxels.

use cgmath::Point3;
use log::debug;

use crate::editing::falloff::FalloffCurve;
use crate::voxels::world::World;

/// Lower bound on the center distance, so the strength term stays finite for
/// the voxel at the exact edit center.
const MIN_EDIT_DISTANCE: f32 = 1e-4;

/// Solid densities stay at or above this value; an edit that drops a voxel
/// below it also resets the voxel's stored material.
const MATERIAL_RESET_THRESHOLD: f32 = 0.5;

/// Checks whether the space around an edit center is free of obstructions.
///
/// Add edits are preconditioned on this so material is never placed inside
/// other objects occupying the scene.
pub trait PlacementGuard {
    /// Returns true when a sphere at `center` with the given radius overlaps
    /// nothing but terrain.
    fn is_clear(&self, center: Point3<f32>, radius: f32) -> bool;
}

/// A guard that approves every placement.
pub struct AlwaysClear;

impl PlacementGuard for AlwaysClear {
    fn is_clear(&self, _center: Point3<f32>, _radius: f32) -> bool {
        true
    }
}

/// Translates world-space edits into density deltas.
pub struct TerrainEditor {
    falloff: FalloffCurve,
    guard: Box<dyn PlacementGuard>,
}

impl TerrainEditor {
    /// Creates an editor with full-strength falloff and no placement
    /// restrictions.
    pub fn new() -> Self {
        TerrainEditor {
            falloff: FalloffCurve::constant(1.0),
            guard: Box::new(AlwaysClear),
        }
    }

    /// Replaces the strength falloff curve.
    pub fn with_falloff(mut self, falloff: FalloffCurve) -> Self {
        self.falloff = falloff;
        self
    }

    /// Replaces the placement guard consulted before add edits.
    pub fn with_guard(mut self, guard: Box<dyn PlacementGuard>) -> Self {
        self.guard = guard;
        self
    }

    /// Applies one spherical edit centered at `point`.
    ///
    /// Every voxel within `range` of the center receives a density delta of
    /// `force / distance`, scaled by the falloff curve evaluated at
    /// `1 - distance / force` and clamped so densities stay in `[0, 1]`.
    /// Writes go through the world's propagating setter, so boundary samples
    /// stay consistent and touched chunks are flagged dirty.
    ///
    /// # Arguments
    /// * `world` - The world to modify
    /// * `point` - World-space edit center, in voxel units
    /// * `add` - True to add material, false to carve it away
    /// * `force` - Peak strength of the edit
    /// * `range` - Edit radius in voxels
    ///
    /// # Returns
    /// False when the edit was rejected without touching the world: a
    /// non-positive force or range, or an add blocked by the placement guard.
    pub fn apply_edit(
        &self,
        world: &mut World,
        point: Point3<f32>,
        add: bool,
        force: f32,
        range: f32,
    ) -> bool {
        if force <= 0.0 || range <= 0.0 {
            return false;
        }
        if add && !self.guard.is_clear(point, range / 2.0 * 0.8) {
            debug!("Add edit at {:?} blocked by placement guard", point);
            return false;
        }

        let build_modifier = if add { 1.0 } else { -1.0 };
        // Ties round away from zero. Either tie direction keeps the sweep
        // box covering the whole range ball, since the box half-side
        // ceil(range) is at least range + 0.5 rounded down; membership is
        // decided by the distance filter alone.
        let center = Point3::new(
            point.x.round() as i32,
            point.y.round() as i32,
            point.z.round() as i32,
        );
        let extent = range.ceil() as i32;

        for x in -extent..=extent {
            for y in -extent..=extent {
                for z in -extent..=extent {
                    let voxel = Point3::new(center.x - x, center.y - y, center.z - z);
                    if !world.contains(voxel.x, voxel.y, voxel.z) {
                        continue;
                    }

                    let distance = ((voxel.x as f32 - point.x).powi(2)
                        + (voxel.y as f32 - point.y).powi(2)
                        + (voxel.z as f32 - point.z).powi(2))
                    .sqrt();
                    if distance > range {
                        continue;
                    }

                    // Strength decays with distance from the center; the
                    // curve input normalizes distance against the force.
                    let strength = force / distance.max(MIN_EDIT_DISTANCE)
                        * self.falloff.evaluate(1.0 - distance / force)
                        * build_modifier;

                    let Ok(old_density) = world.get_density(voxel.x, voxel.y, voxel.z) else {
                        continue;
                    };
                    let new_density = (old_density + strength).clamp(0.0, 1.0);

                    if world
                        .set_density_and_propagate(voxel.x, voxel.y, voxel.z, new_density, true)
                        .is_err()
                    {
                        continue;
                    }

                    let old_raw = world.raw_value(voxel.x, voxel.y, voxel.z);
                    if new_density < MATERIAL_RESET_THRESHOLD {
                        // Mostly carved away: the voxel loses its material.
                        world.set_raw_value(voxel.x, voxel.y, voxel.z, new_density);
                    } else {
                        world.set_raw_value(
                            voxel.x,
                            voxel.y,
                            voxel.z,
                            old_raw.floor() + new_density,
                        );
                    }
                }
            }
        }
        true
    }
}

impl Default for TerrainEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::generation::RawField;
    use crate::voxels::world::WorldConfig;

    fn test_config() -> WorldConfig {
        WorldConfig {
            chunk_size: 4,
            isolevel: 0.5,
            world_length: 2,
            world_width: 2,
            world_height: 2,
            generation_kind_id: 0,
            seed: 1,
            radius: 3,
            shell_thickness: 1,
            noise_freq: 0.02,
            noise_scale: 1.0,
        }
    }

    fn uniform_world(raw: f32) -> World {
        let mut field = RawField::new(9, 9, 9);
        for x in 0..9 {
            for y in 0..9 {
                for z in 0..9 {
                    field.set(x, y, z, raw);
                }
            }
        }
        World::from_field(test_config(), field).unwrap()
    }

    struct RejectAll;

    impl PlacementGuard for RejectAll {
        fn is_clear(&self, _center: Point3<f32>, _radius: f32) -> bool {
            false
        }
    }

    #[test]
    fn carving_empty_space_stays_empty() {
        let mut world = uniform_world(0.0);
        let editor = TerrainEditor::new();
        assert!(editor.apply_edit(&mut world, Point3::new(4.0, 4.0, 4.0), false, 2.0, 2.0));

        for offset in [(4, 4, 4), (3, 4, 4), (5, 5, 5)] {
            assert_eq!(world.get_density(offset.0, offset.1, offset.2).unwrap(), 0.0);
        }
    }

    #[test]
    fn adding_to_full_density_stays_clamped() {
        let mut world = uniform_world(0.999);
        let editor = TerrainEditor::new();
        assert!(editor.apply_edit(&mut world, Point3::new(4.0, 4.0, 4.0), true, 2.0, 2.0));

        let density = world.get_density(4, 4, 4).unwrap();
        assert_eq!(density, 1.0);
    }

    #[test]
    fn carve_reduces_density_and_flags_chunks() {
        let mut world = uniform_world(0.9);
        world.process_dirty_chunks();
        let editor = TerrainEditor::new();
        assert!(editor.apply_edit(&mut world, Point3::new(4.0, 4.0, 4.0), false, 2.0, 2.0));

        let density = world.get_density(4, 4, 4).unwrap();
        assert!(density < 0.9, "center density was not reduced: {density}");
        assert!(world.process_dirty_chunks() > 0);
    }

    #[test]
    fn half_voxel_center_edits_exactly_the_in_range_voxels() {
        let mut world = uniform_world(0.4);
        let editor = TerrainEditor::new();

        // Center halfway between two lattice points: only (4,4,4) and
        // (5,4,4) lie within range 1.0, each at distance 0.5, no matter
        // which way the center rounds.
        assert!(editor.apply_edit(&mut world, Point3::new(4.5, 4.0, 4.0), false, 0.1, 1.0));

        let mut changed = Vec::new();
        for x in 0..8 {
            for y in 0..8 {
                for z in 0..8 {
                    let density = world.get_density(x, y, z).unwrap();
                    if (density - 0.4).abs() > 1e-6 {
                        changed.push((x, y, z, density));
                    }
                }
            }
        }
        assert_eq!(changed.len(), 2, "changed voxels: {changed:?}");
        for &(x, y, z, density) in &changed {
            assert!(x == 4 || x == 5);
            assert_eq!((y, z), (4, 4));
            // strength = 0.1 / 0.5 with full falloff
            assert!((density - 0.2).abs() < 1e-6, "voxel ({x}, {y}, {z})");
        }
    }

    #[test]
    fn non_positive_force_or_range_is_rejected() {
        let mut world = uniform_world(0.5);
        let editor = TerrainEditor::new();
        assert!(!editor.apply_edit(&mut world, Point3::new(4.0, 4.0, 4.0), false, 0.0, 2.0));
        assert!(!editor.apply_edit(&mut world, Point3::new(4.0, 4.0, 4.0), false, 2.0, -1.0));
    }

    #[test]
    fn blocked_guard_rejects_add_edits_untouched() {
        let mut world = uniform_world(0.3);
        world.process_dirty_chunks();
        let editor = TerrainEditor::new().with_guard(Box::new(RejectAll));

        assert!(!editor.apply_edit(&mut world, Point3::new(4.0, 4.0, 4.0), true, 2.0, 2.0));
        assert_eq!(world.get_density(4, 4, 4).unwrap(), 0.3);
        assert_eq!(world.process_dirty_chunks(), 0);

        // Carves are not guarded.
        assert!(editor.apply_edit(&mut world, Point3::new(4.0, 4.0, 4.0), false, 2.0, 2.0));
    }

    #[test]
    fn heavy_carve_resets_stored_material() {
        let mut world = uniform_world(0.0);
        // Material 2 with high density at the center voxel.
        world.set_raw_value(4, 4, 4, 2.9);
        world
            .set_density_and_propagate(4, 4, 4, 0.9, false)
            .unwrap();

        let editor = TerrainEditor::new();
        assert!(editor.apply_edit(&mut world, Point3::new(4.0, 4.0, 4.0), false, 2.0, 2.0));

        let raw = world.raw_value(4, 4, 4);
        assert!(raw < 1.0, "material id survived a full carve: {raw}");
    }

    #[test]
    fn partial_add_keeps_stored_material() {
        let mut world = uniform_world(0.0);
        world.set_raw_value(4, 4, 4, 2.4);
        world
            .set_density_and_propagate(4, 4, 4, 0.4, false)
            .unwrap();

        let editor = TerrainEditor::new();
        // A gentle off-center add pushes the voxel from 0.4 to 0.8, past the
        // reset threshold but below full density, keeping the material.
        assert!(editor.apply_edit(&mut world, Point3::new(4.5, 4.0, 4.0), true, 0.2, 1.0));

        let raw = world.raw_value(4, 4, 4);
        assert_eq!(raw.floor(), 2.0, "material id was lost: {raw}");
        assert!((raw - 2.8).abs() < 1e-5, "unexpected raw value: {raw}");
    }
}
