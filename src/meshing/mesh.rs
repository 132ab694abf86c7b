//! Triangle mesh output of the marching-cubes extractor.

use cgmath::{InnerSpace, Point3, Vector3};

/// A triangle soup extracted from one chunk's voxel field.
///
/// Vertex positions are chunk-local; consumers offset them by the owning
/// chunk's world origin. The mesh is stateless output: it is recomputed
/// wholesale on every re-mesh and never patched incrementally.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions in chunk-local space.
    pub vertices: Vec<Point3<f32>>,
    /// Per-vertex normals, rebuilt by [`Mesh::recalculate_normals`].
    pub normals: Vec<Vector3<f32>>,
    /// Triangle indices into `vertices`, three per triangle.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Mesh {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Returns true if the mesh holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recomputes all vertex normals from the current triangle set.
    ///
    /// Each triangle contributes its area-weighted face normal to its three
    /// vertices; the accumulated vectors are then normalized. Degenerate
    /// triangles contribute nothing.
    pub fn recalculate_normals(&mut self) {
        self.normals = vec![Vector3::new(0.0, 0.0, 0.0); self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let (ia, ib, ic) = (triangle[0] as usize, triangle[1] as usize, triangle[2] as usize);
            let a = self.vertices[ia];
            let b = self.vertices[ib];
            let c = self.vertices[ic];

            // Cross product magnitude is twice the triangle area, so larger
            // faces weigh more in the accumulated vertex normal.
            let face = (b - a).cross(c - a);
            self.normals[ia] += face;
            self.normals[ib] += face;
            self.normals[ic] += face;
        }

        for normal in &mut self.normals {
            if normal.magnitude2() > 0.0 {
                *normal = normal.normalize();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mesh_has_no_triangles() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn recalculated_normals_are_unit_length() {
        let mut mesh = Mesh::new();
        mesh.vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        mesh.indices = vec![0, 1, 2];
        mesh.recalculate_normals();

        assert_eq!(mesh.normals.len(), 3);
        for normal in &mesh.normals {
            assert!((normal.magnitude() - 1.0).abs() < 1e-6);
            // Counter-clockwise triangle in the XY plane faces +Z
            assert!((normal.z - 1.0).abs() < 1e-6);
        }
    }
}
