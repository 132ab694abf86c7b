//! # Generation Module
//!
//! Density providers for the initial asteroid field.
//!
//! A provider produces a single `f32` per world voxel with an overloaded
//! encoding: the integer part is the material id and the fractional part is
//! the density in `[0, 1)`. The same encoding backs the persistent
//! [`RawField`] store that outlives the per-chunk density copies, so the
//! split is implemented once here and reused everywhere.
//!
//! ## Asteroid Shapes
//!
//! [`AsteroidGenerator`] fills a bounded field with one of three shapes:
//! a solid sphere with a density gradient shell, a noisy sphere whose voxels
//! carry randomized material ids perturbed by Perlin noise, and a hollow
//! shell whose density peaks mid-shell.

use log::info;
use noise::{NoiseFn, Perlin};
use num_derive::FromPrimitive;

/// Produces the combined material/density value for world voxels.
///
/// Out-of-bounds queries return `0.0` (empty space, material 0).
pub trait DensityProvider {
    /// Returns the combined value at the given world voxel: integer part is
    /// the material id, fractional part the density.
    fn sample(&self, x: i32, y: i32, z: i32) -> f32;

    /// Returns the density in `[0, 1)` at the given world voxel.
    fn density_at(&self, x: i32, y: i32, z: i32) -> f32 {
        let raw = self.sample(x, y, z);
        raw - raw.floor()
    }

    /// Returns the material id at the given world voxel.
    fn material_at(&self, x: i32, y: i32, z: i32) -> i32 {
        self.sample(x, y, z).floor() as i32
    }
}

/// A dense, bounded field of combined material/density values.
///
/// This is the persistent raw store for the world: chunks copy their live
/// densities out of it at build time, and the terrain editor writes edited
/// values back into it so the long-lived material encoding stays current.
#[derive(Clone, Debug)]
pub struct RawField {
    length: i32,
    width: i32,
    height: i32,
    data: Vec<f32>,
}

impl RawField {
    /// Creates a zero-filled field of the given voxel dimensions.
    pub fn new(length: i32, width: i32, height: i32) -> Self {
        let count = (length.max(0) as usize) * (width.max(0) as usize) * (height.max(0) as usize);
        RawField {
            length,
            width,
            height,
            data: vec![0.0; count],
        }
    }

    /// Returns true if the field holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Field dimensions in voxels, as `(length, width, height)`.
    pub fn dimensions(&self) -> (i32, i32, i32) {
        (self.length, self.width, self.height)
    }

    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if x >= 0 && x < self.length && y >= 0 && y < self.width && z >= 0 && z < self.height {
            Some((x + y * self.length + z * self.length * self.width) as usize)
        } else {
            None
        }
    }

    /// Returns the stored value, or `0.0` outside the field.
    pub fn get(&self, x: i32, y: i32, z: i32) -> f32 {
        match self.index(x, y, z) {
            Some(i) => self.data[i],
            None => 0.0,
        }
    }

    /// Stores a value; writes outside the field are ignored.
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: f32) {
        if let Some(i) = self.index(x, y, z) {
            self.data[i] = value;
        }
    }
}

impl DensityProvider for RawField {
    fn sample(&self, x: i32, y: i32, z: i32) -> f32 {
        self.get(x, y, z)
    }
}

/// The asteroid shape used to fill the initial field.
///
/// The `FromPrimitive` derive allows conversion from the numeric id carried
/// by world configuration files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
pub enum GenerationKind {
    /// Solid sphere with a density gradient across its outer shell.
    Sphere,
    /// Sphere of randomized materials perturbed by Perlin noise.
    Perlin,
    /// Hollow shell with density peaking between the inner and outer radius.
    Hollow,
}

/// Fills a bounded raw field with an asteroid shape.
pub struct AsteroidGenerator {
    seed: i32,
    radius: i32,
    shell_thickness: i32,
    noise_freq: f64,
    noise_scale: f64,
    perlin: Perlin,
}

impl AsteroidGenerator {
    /// Creates a generator for the given seed and shape parameters.
    ///
    /// # Arguments
    /// * `seed` - Seed for both the Perlin noise and the material randomizer
    /// * `radius` - Asteroid radius in voxels
    /// * `shell_thickness` - Width of the density gradient shell in voxels
    /// * `noise_freq` - Frequency applied to Perlin noise samples
    /// * `noise_scale` - Divisor applied to voxel coordinates before sampling
    pub fn new(seed: i32, radius: i32, shell_thickness: i32, noise_freq: f64, noise_scale: f64) -> Self {
        AsteroidGenerator {
            seed,
            radius,
            shell_thickness,
            noise_freq,
            noise_scale,
            perlin: Perlin::new(seed as u32),
        }
    }

    /// Generates a field of the given voxel dimensions for the given shape.
    ///
    /// The center of the asteroid sits at the center of the field; voxels
    /// outside the radius keep the zero fill (empty space, material 0).
    pub fn generate(&self, kind: GenerationKind, length: i32, width: i32, height: i32) -> RawField {
        info!(
            "Generating {:?} asteroid, radius {} in a {}x{}x{} field",
            kind, self.radius, length, width, height
        );
        match kind {
            GenerationKind::Sphere => self.sphere_field(length, width, height),
            GenerationKind::Perlin => self.perlin_field(length, width, height),
            GenerationKind::Hollow => self.hollow_field(length, width, height),
        }
    }

    /// Squared radius of the inner solid region, inside the gradient shell.
    fn inner_radius_squared(&self) -> f32 {
        let inner = (self.radius - self.shell_thickness) as f32;
        inner * inner
    }

    /// Difference between the outer and inner squared radii, used to
    /// normalize the density gradient across the shell.
    fn shell_difference_squared(&self) -> f32 {
        (self.radius * self.radius) as f32 - self.inner_radius_squared()
    }

    fn sphere_field(&self, length: i32, width: i32, height: i32) -> RawField {
        let mut field = RawField::new(length, width, height);
        let rad_squared = (self.radius * self.radius) as f32;
        let inner_squared = self.inner_radius_squared();
        let difference_squared = self.shell_difference_squared();

        for x in -self.radius..self.radius {
            for y in -self.radius..self.radius {
                for z in -self.radius..self.radius {
                    let dist_squared = (x * x + y * y + z * z) as f32;

                    let (fx, fy, fz) = (x + length / 2, y + width / 2, z + height / 2);
                    if dist_squared <= inner_squared {
                        field.set(fx, fy, fz, 1.0);
                    } else if dist_squared <= rad_squared {
                        // Gradient from the inner shell (1.0) down to the surface (0.0)
                        field.set(fx, fy, fz, (rad_squared - dist_squared) / difference_squared);
                    }
                }
            }
        }
        field
    }

    fn perlin_field(&self, length: i32, width: i32, height: i32) -> RawField {
        let mut field = RawField::new(length, width, height);
        let rad_squared = (self.radius * self.radius) as f32;
        let inner_squared = self.inner_radius_squared();
        let difference_squared = self.shell_difference_squared();
        let mut rng = fastrand::Rng::with_seed(self.seed as u64);

        for x in -self.radius..self.radius {
            for y in -self.radius..self.radius {
                for z in -self.radius..self.radius {
                    let dist_squared = (x * x + y * y + z * z) as f32;
                    if dist_squared > rad_squared {
                        continue;
                    }
                    let grad = 1.0 - (rad_squared - dist_squared) / difference_squared;

                    let material = rng.i32(0..3) as f32;
                    let noise = self.noise_at(x, y, z);
                    let value = if dist_squared <= inner_squared {
                        material + noise
                    } else {
                        // Fade the noise out towards the surface
                        material + noise * (1.0 - grad)
                    };

                    field.set(x + length / 2, y + width / 2, z + height / 2, value);
                }
            }
        }
        field
    }

    fn hollow_field(&self, length: i32, width: i32, height: i32) -> RawField {
        let mut field = RawField::new(length, width, height);
        let rad_squared = (self.radius * self.radius) as f32;
        let inner_squared = self.inner_radius_squared();
        let difference_squared = self.shell_difference_squared();
        let mid_shell = self.radius as f32 - self.shell_thickness as f32 * 0.5;
        let mid_shell_squared = mid_shell * mid_shell;

        for x in -self.radius..self.radius {
            for y in -self.radius..self.radius {
                for z in -self.radius..self.radius {
                    let dist_squared = (x * x + y * y + z * z) as f32;
                    let grad = 1.0 - (rad_squared - dist_squared) / difference_squared;

                    let (fx, fy, fz) = (x + length / 2, y + width / 2, z + height / 2);
                    if dist_squared <= inner_squared {
                        field.set(fx, fy, fz, 0.0);
                    } else if dist_squared <= mid_shell_squared {
                        field.set(fx, fy, fz, grad + 0.4);
                    } else if dist_squared <= rad_squared {
                        field.set(fx, fy, fz, -(grad - 1.0) + 0.4);
                    }
                }
            }
        }
        field
    }

    fn noise_at(&self, x: i32, y: i32, z: i32) -> f32 {
        let scaled = |v: i32| ((v + self.radius) as f64 / self.noise_scale) * self.noise_freq;
        self.perlin.get([scaled(x), scaled(y), scaled(z)]) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_field_out_of_bounds_reads_empty() {
        let field = RawField::new(4, 4, 4);
        assert_eq!(field.get(-1, 0, 0), 0.0);
        assert_eq!(field.get(0, 4, 0), 0.0);
        assert_eq!(field.get(0, 0, 100), 0.0);
    }

    #[test]
    fn raw_field_out_of_bounds_writes_are_ignored() {
        let mut field = RawField::new(2, 2, 2);
        field.set(5, 0, 0, 1.0);
        assert_eq!(field.get(5, 0, 0), 0.0);
        field.set(1, 1, 1, 0.75);
        assert_eq!(field.get(1, 1, 1), 0.75);
    }

    #[test]
    fn combined_encoding_splits_into_material_and_density() {
        let mut field = RawField::new(1, 1, 1);
        field.set(0, 0, 0, 2.25);
        assert_eq!(field.material_at(0, 0, 0), 2);
        assert!((field.density_at(0, 0, 0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn whole_values_read_as_zero_density() {
        // A stored 1.0 means material 1 with density 0; the fractional part
        // alone carries the live density.
        let mut field = RawField::new(1, 1, 1);
        field.set(0, 0, 0, 1.0);
        assert_eq!(field.material_at(0, 0, 0), 1);
        assert_eq!(field.density_at(0, 0, 0), 0.0);
    }

    #[test]
    fn sphere_field_has_gradient_shell() {
        let generator = AsteroidGenerator::new(7, 8, 2, 0.02, 1.0);
        let field = generator.generate(GenerationKind::Sphere, 20, 20, 20);
        // Deep interior voxel carries the full combined value.
        assert_eq!(field.get(10, 10, 10), 1.0);
        // A voxel in the shell carries a strictly fractional gradient value.
        let shell = field.get(10 + 7, 10, 10);
        assert!(shell > 0.0 && shell < 1.0, "shell value was {shell}");
        // Far corner stays empty.
        assert_eq!(field.get(0, 0, 0), 0.0);
    }

    #[test]
    fn perlin_field_is_deterministic_per_seed() {
        let a = AsteroidGenerator::new(42, 6, 1, 0.1, 1.0).generate(GenerationKind::Perlin, 16, 16, 16);
        let b = AsteroidGenerator::new(42, 6, 1, 0.1, 1.0).generate(GenerationKind::Perlin, 16, 16, 16);
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    assert_eq!(a.get(x, y, z), b.get(x, y, z), "mismatch at ({x}, {y}, {z})");
                }
            }
        }
    }

    #[test]
    fn hollow_field_is_empty_at_center() {
        let generator = AsteroidGenerator::new(3, 8, 2, 0.02, 1.0);
        let field = generator.generate(GenerationKind::Hollow, 20, 20, 20);
        assert_eq!(field.get(10, 10, 10), 0.0);
    }
}
