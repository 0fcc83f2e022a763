//! # Built-in Shapes
//!
//! Small shapes for scenes that don't load models: the flat triangle, quad and
//! house outlines facing -Z, and a cube.

use cgmath::Vector3;

use super::GeometryData;

const TOWARD_VIEWER: [f32; 3] = [0.0, 0.0, -1.0];

/// Builds a flat shape in the XY plane facing -Z, mapping the bounding box to UV space.
fn flat_shape(positions: &[[f32; 2]], indices: &[u32]) -> GeometryData {
    let (mut min, mut max) = ([f32::MAX; 2], [f32::MIN; 2]);
    for p in positions {
        for axis in 0..2 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    let extent = [
        (max[0] - min[0]).max(f32::EPSILON),
        (max[1] - min[1]).max(f32::EPSILON),
    ];

    GeometryData {
        positions: positions.iter().map(|p| [p[0], p[1], 0.0]).collect(),
        normals: vec![TOWARD_VIEWER; positions.len()],
        uvs: positions
            .iter()
            .map(|p| [(p[0] - min[0]) / extent[0], (max[1] - p[1]) / extent[1]])
            .collect(),
        indices: indices.to_vec(),
    }
}

/// A single triangle, 0.4 units wide.
pub fn triangle() -> GeometryData {
    flat_shape(&[[0.0, 0.2], [0.2, -0.2], [-0.2, -0.2]], &[0, 1, 2])
}

/// A tall 0.2 by 1.2 rectangle left of the origin.
pub fn quad() -> GeometryData {
    flat_shape(
        &[[-0.6, 0.6], [-0.4, 0.6], [-0.4, -0.6], [-0.6, -0.6]],
        &[0, 1, 2, 0, 2, 3],
    )
}

/// A house outline (square body under a triangular roof) right of the origin.
pub fn house() -> GeometryData {
    flat_shape(
        &[
            [0.6, 0.8],
            [0.85, 0.5],
            [0.35, 0.5],
            [0.85, 0.0],
            [0.6, 0.0],
            [0.35, 0.0],
        ],
        &[0, 1, 2, 1, 3, 4, 2, 1, 4, 2, 4, 5],
    )
}

/// An axis-aligned cube centered at the origin with per-face normals.
pub fn cube(size: f32) -> GeometryData {
    let half = size * 0.5;
    let faces: [(Vector3<f32>, Vector3<f32>); 6] = [
        (-Vector3::unit_z(), Vector3::unit_y()),
        (Vector3::unit_z(), Vector3::unit_y()),
        (-Vector3::unit_x(), Vector3::unit_y()),
        (Vector3::unit_x(), Vector3::unit_y()),
        (Vector3::unit_y(), Vector3::unit_z()),
        (-Vector3::unit_y(), Vector3::unit_z()),
    ];

    let mut data = GeometryData::new();
    for (normal, up) in faces {
        // Right as seen by a viewer looking at the face from outside.
        let right = up.cross(-normal);
        let center = normal * half;
        let base = data.positions.len() as u32;

        let corners = [
            (center - right * half - up * half, [0.0, 1.0]),
            (center - right * half + up * half, [0.0, 0.0]),
            (center + right * half + up * half, [1.0, 0.0]),
            (center + right * half - up * half, [1.0, 1.0]),
        ];
        for (position, uv) in corners {
            data.positions.push(position.into());
            data.normals.push(normal.into());
            data.uvs.push(uv);
        }
        data.indices
            .extend_from_slice(&[base + 1, base + 2, base + 3, base + 1, base + 3, base]);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::calculate_face_normals;

    #[test]
    fn test_flat_shapes_face_the_viewer() {
        for shape in [triangle(), quad(), house()] {
            let computed = calculate_face_normals(&shape.positions, &shape.indices);
            for normal in computed {
                assert!((normal[2] + 1.0).abs() < 1e-6, "normal {:?}", normal);
                assert_eq!([normal[0], normal[1]], [0.0, 0.0]);
            }
        }
    }

    #[test]
    fn test_shape_counts() {
        assert_eq!(triangle().indices, vec![0, 1, 2]);
        assert_eq!(quad().triangle_count(), 2);
        assert_eq!(house().vertex_count(), 6);
        assert_eq!(house().triangle_count(), 4);
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = cube(2.0);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);

        let computed = calculate_face_normals(&cube.positions, &cube.indices);
        for (computed, declared) in computed.iter().zip(&cube.normals) {
            for axis in 0..3 {
                assert!((computed[axis] - declared[axis]).abs() < 1e-6);
            }
        }
        assert!(cube
            .positions
            .iter()
            .all(|p| p.iter().all(|c| c.abs() <= 1.0 + 1e-6)));
    }
}
