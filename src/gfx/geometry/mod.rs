//! # Geometry Data
//!
//! CPU-side vertex and index arrays, produced by the built-in primitives and by
//! the OBJ loader, and turned into a [`Mesh`](crate::gfx::scene::Mesh) with
//! [`Mesh::from_geometry`](crate::gfx::scene::Mesh::from_geometry).
//!
//! Triangles are wound clockwise when seen from the side their normal points
//! to. That is the front face for the left-handed pipeline.
//!
//! ```no_run
//! use scenery::gfx::geometry::{cube, triangle};
//!
//! let tri = triangle();
//! assert_eq!(tri.indices.len(), 3);
//! let cube = cube(1.0);
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use cgmath::{InnerSpace, Vector3, Zero};

use crate::gfx::scene::vertex::Vertex;

/// Geometry ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub positions: Vec<[f32; 3]>,
    /// One per position. Missing normals are filled in by [`to_vertices`](Self::to_vertices).
    pub normals: Vec<[f32; 3]>,
    /// One per position, or empty.
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves the arrays into [`Vertex`] records.
    ///
    /// If the normal array does not match the positions, area-weighted face
    /// normals are computed from the triangles instead.
    pub fn to_vertices(&self) -> Vec<Vertex> {
        let computed;
        let normals = if self.normals.len() == self.positions.len() {
            &self.normals
        } else {
            computed = calculate_face_normals(&self.positions, &self.indices);
            &computed
        };

        self.positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position: *position,
                normal: normals[i],
                uv: self.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

/// Accumulates each triangle's face normal into its three vertices, then
/// normalizes. Out-of-range indices are skipped; vertices touched by no
/// triangle keep a zero normal.
pub fn calculate_face_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::<f32>::zero(); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }
        let v0 = Vector3::from(positions[i0]);
        let v1 = Vector3::from(positions[i1]);
        let v2 = Vector3::from(positions[i2]);

        // Clockwise front faces: edge order gives the outward normal.
        let face_normal = (v1 - v0).cross(v2 - v0);
        for index in [i0, i1, i2] {
            sums[index] += face_normal;
        }
    }

    sums.into_iter()
        .map(|sum| {
            if sum.magnitude2() > f32::EPSILON {
                sum.normalize().into()
            } else {
                [0.0, 0.0, 0.0]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normals_point_toward_viewer() {
        // Clockwise when viewed from -Z.
        let positions = [[0.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, -1.0, 0.0]];
        let normals = calculate_face_normals(&positions, &[0, 1, 2]);
        for normal in normals {
            assert_eq!(normal, [0.0, 0.0, -1.0]);
        }
    }

    #[test]
    fn test_to_vertices_fills_missing_normals() {
        let geometry = GeometryData {
            positions: vec![[0.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, -1.0, 0.0]],
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: vec![0, 1, 2],
        };
        let vertices = geometry.to_vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].normal, [0.0, 0.0, -1.0]);
        assert_eq!(vertices[2].uv, [0.0, 0.0]);
    }
}
