//! # Marching Cubes Module
//!
//! Extracts a triangle mesh from a chunk's voxel samples.
//!
//! Each unit cube of the chunk is classified by which of its 8 corners lie
//! below the isolevel, the convention [`tables::EDGE_TABLE`] and
//! [`tables::TRI_TABLE`] are built for; the table winding then faces
//! triangles out of the solid. The classification selects a precomputed
//! triangulation, and the surface vertices are placed on the crossed cube
//! edges by linear interpolation of the corner densities.
//!
//! Because adjacent chunks duplicate their boundary sample layer, running the
//! extractor independently per chunk still yields watertight seams: both
//! sides of a shared face classify identical cubes from identical densities.

use cgmath::Point3;

use crate::meshing::mesh::Mesh;
use crate::meshing::tables::{CUBE_POINTS, EDGE_CONNECTIONS, EDGE_TABLE, TRI_TABLE};
use crate::voxels::voxel_point::VoxelPoint;

/// When two corner densities are this close, edge interpolation falls back
/// to the edge midpoint instead of dividing by a near-zero span.
const DEGENERATE_EDGE_EPSILON: f32 = 1e-6;

/// Marker for a cube edge that has not produced a vertex yet.
const NO_VERTEX: u32 = u32::MAX;

/// Extracts the isosurface mesh from a chunk's samples.
///
/// `points` must hold `(chunk_size + 1)^3` samples in `x + dim * y +
/// dim^2 * z` order. Vertex positions in the returned mesh are chunk-local.
///
/// # Arguments
/// * `points` - The chunk's voxel samples including the boundary overlap
/// * `chunk_size` - Number of unit cubes per axis
/// * `isolevel` - Densities above this value are inside the solid
///
/// # Returns
/// A mesh with freshly computed vertex normals; empty when no cube crosses
/// the isolevel.
pub fn create_mesh(points: &[VoxelPoint], chunk_size: i32, isolevel: f32) -> Mesh {
    let dimension = chunk_size + 1;
    let sample = |x: i32, y: i32, z: i32| -> f32 {
        points[(x + y * dimension + z * dimension * dimension) as usize].density
    };

    let mut mesh = Mesh::new();
    let mut corner_densities = [0.0f32; 8];
    let mut corner_positions = [Point3::new(0.0f32, 0.0, 0.0); 8];

    for z in 0..chunk_size {
        for y in 0..chunk_size {
            for x in 0..chunk_size {
                let mut cube_index = 0usize;
                for (i, offset) in CUBE_POINTS.iter().enumerate() {
                    let (cx, cy, cz) = (x + offset[0], y + offset[1], z + offset[2]);
                    corner_densities[i] = sample(cx, cy, cz);
                    corner_positions[i] = Point3::new(cx as f32, cy as f32, cz as f32);
                    // Bit set for corners below the isolevel, matching the
                    // table convention so triangles wind facing outward.
                    if corner_densities[i] < isolevel {
                        cube_index |= 1 << i;
                    }
                }

                let crossed_edges = EDGE_TABLE[cube_index];
                if crossed_edges == 0 {
                    continue;
                }

                // Each crossed edge yields one vertex, shared by every
                // triangle of this cube that references the edge.
                let mut edge_vertex_indices = [NO_VERTEX; 12];
                for edge in 0..12 {
                    if crossed_edges & (1 << edge) == 0 {
                        continue;
                    }
                    let [a, b] = EDGE_CONNECTIONS[edge];
                    let vertex = interpolate_edge(
                        corner_positions[a],
                        corner_positions[b],
                        corner_densities[a],
                        corner_densities[b],
                        isolevel,
                    );
                    edge_vertex_indices[edge] = mesh.vertices.len() as u32;
                    mesh.vertices.push(vertex);
                }

                for &edge in TRI_TABLE[cube_index].iter().take_while(|&&e| e >= 0) {
                    mesh.indices.push(edge_vertex_indices[edge as usize]);
                }
            }
        }
    }

    mesh.recalculate_normals();
    mesh
}

/// Places a surface vertex on the cube edge between two corners.
///
/// The vertex sits where linear interpolation of the two densities crosses
/// the isolevel, clamped to the edge. Near-equal densities place it at the
/// midpoint.
fn interpolate_edge(
    a: Point3<f32>,
    b: Point3<f32>,
    density_a: f32,
    density_b: f32,
    isolevel: f32,
) -> Point3<f32> {
    let span = density_b - density_a;
    let t = if span.abs() < DEGENERATE_EDGE_EPSILON {
        0.5
    } else {
        ((isolevel - density_a) / span).clamp(0.0, 1.0)
    };
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_points(chunk_size: i32, density: f32) -> Vec<VoxelPoint> {
        let dimension = chunk_size + 1;
        let mut points = Vec::new();
        for z in 0..dimension {
            for y in 0..dimension {
                for x in 0..dimension {
                    points.push(VoxelPoint::new(Point3::new(x, y, z), density, 0));
                }
            }
        }
        points
    }

    fn set_density(points: &mut [VoxelPoint], chunk_size: i32, x: i32, y: i32, z: i32, d: f32) {
        let dimension = chunk_size + 1;
        points[(x + y * dimension + z * dimension * dimension) as usize].density = d;
    }

    #[test]
    fn uniform_fields_produce_no_triangles() {
        let empty = create_mesh(&uniform_points(4, 0.0), 4, 0.5);
        assert!(empty.is_empty());

        let solid = create_mesh(&uniform_points(4, 1.0), 4, 0.5);
        assert!(solid.is_empty());
    }

    #[test]
    fn single_solid_corner_yields_one_triangle_at_edge_midpoints() {
        let mut points = uniform_points(2, 0.0);
        set_density(&mut points, 2, 0, 0, 0, 1.0);

        let mesh = create_mesh(&points, 2, 0.5);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertices.len(), 3);

        // Densities 0 and 1 around isolevel 0.5 put every crossing at an
        // edge midpoint.
        let expected = [
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(0.0, 0.5, 0.0),
            Point3::new(0.0, 0.0, 0.5),
        ];
        for want in expected {
            assert!(
                mesh.vertices
                    .iter()
                    .any(|v| (v.x - want.x).abs() < 1e-6
                        && (v.y - want.y).abs() < 1e-6
                        && (v.z - want.z).abs() < 1e-6),
                "missing vertex {want:?}"
            );
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let mut points = uniform_points(4, 0.2);
        set_density(&mut points, 4, 2, 2, 2, 0.9);
        set_density(&mut points, 4, 2, 3, 2, 0.8);

        let first = create_mesh(&points, 4, 0.5);
        let second = create_mesh(&points, 4, 0.5);
        assert_eq!(first.vertices, second.vertices);
        assert_eq!(first.indices, second.indices);
    }

    #[test]
    fn corner_exactly_at_isolevel_stays_finite() {
        let mut points = uniform_points(2, 0.5);
        set_density(&mut points, 2, 1, 1, 1, 0.0);

        let mesh = create_mesh(&points, 2, 0.5);
        assert!(!mesh.is_empty());
        for vertex in &mesh.vertices {
            assert!(vertex.x.is_finite() && vertex.y.is_finite() && vertex.z.is_finite());
        }
        for normal in &mesh.normals {
            assert!(normal.x.is_finite() && normal.y.is_finite() && normal.z.is_finite());
        }
    }

    #[test]
    fn normals_point_away_from_the_solid() {
        // Solid corner at the origin: the one emitted triangle must face
        // away from it, towards the empty region.
        let mut points = uniform_points(2, 0.0);
        set_density(&mut points, 2, 0, 0, 0, 1.0);

        let mesh = create_mesh(&points, 2, 0.5);
        assert_eq!(mesh.triangle_count(), 1);
        for (vertex, normal) in mesh.vertices.iter().zip(&mesh.normals) {
            let outward = normal.x * vertex.x + normal.y * vertex.y + normal.z * vertex.z;
            assert!(
                outward > 0.0,
                "normal {normal:?} at {vertex:?} points into the solid"
            );
        }
    }

    #[test]
    fn vertex_normals_are_unit_length() {
        let mut points = uniform_points(2, 0.0);
        set_density(&mut points, 2, 1, 1, 1, 1.0);

        let mesh = create_mesh(&points, 2, 0.5);
        assert!(!mesh.is_empty());
        for normal in &mesh.normals {
            let magnitude =
                (normal.x * normal.x + normal.y * normal.y + normal.z * normal.z).sqrt();
            assert!((magnitude - 1.0).abs() < 1e-5);
        }
    }
}
