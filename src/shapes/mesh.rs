//! Triangle mesh generation for box and sphere geometry.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::PI;

/// Vertex data for shape meshes (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Box mesh: four vertices per face so each face keeps a flat normal
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let half = Vec3::new(width, height, depth) * 0.5;

    // (normal, u axis, v axis) per face, with u × v == normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * half;
            mesh.vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
            });
        }
        // Counter-clockwise when viewed from outside
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// UV sphere mesh
///
/// Segments are clamped to at least 3 around and 2 top-to-bottom. A radius
/// at or below zero collapses every vertex onto the origin.
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let radius = radius.max(0.0);
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let mut mesh = MeshData::default();
    let mut grid = Vec::with_capacity(hs as usize + 1);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let mut row = Vec::with_capacity(ws as usize + 1);
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let normal = Vec3::new(
                -(u * 2.0 * PI).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * 2.0 * PI).sin() * (v * PI).sin(),
            );
            row.push(mesh.vertices.len() as u32);
            mesh.vertices.push(Vertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
            });
        }
        grid.push(row);
    }

    for iy in 0..hs as usize {
        for ix in 0..ws as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            // Pole rows collapse to a point; skip their degenerate triangles
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs as usize - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_mesh_counts_and_extent() {
        let mesh = box_mesh(2.0, 4.0, 6.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);

        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.position;
            assert!((x.abs() - 1.0).abs() < 1e-6);
            assert!((y.abs() - 2.0).abs() < 1e-6);
            assert!((z.abs() - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let mesh = box_mesh(1.0, 1.0, 1.0);
        for tri in mesh.indices.chunks_exact(3) {
            let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
            let n = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            let face_normal = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(face_normal.dot(n) > 0.0);
        }
    }

    #[test]
    fn test_sphere_mesh_counts() {
        let mesh = sphere_mesh(10.0, 32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        // Two triangles per quad, minus one per quad on each pole row
        assert_eq!(mesh.indices.len(), 32 * 31 * 2 * 3);

        for vertex in &mesh.vertices {
            let length = Vec3::from_array(vertex.position).length();
            assert!((length - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_sphere_mesh_clamps_segments() {
        let mesh = sphere_mesh(1.0, 0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
    }

    #[test]
    fn test_non_positive_radius_is_degenerate() {
        for radius in [0.0, -5.0] {
            let mesh = sphere_mesh(radius, 8, 8);
            assert!(mesh
                .vertices
                .iter()
                .all(|v| Vec3::from_array(v.position) == Vec3::ZERO));
        }
    }
}
