use cgmath::{InnerSpace, Matrix4, Rad, Vector3};

/// Left-handed view matrix looking from `eye` along `direction`.
///
/// Camera space has +X right, +Y up and +Z forward.
pub fn look_to_lh(eye: Vector3<f32>, direction: Vector3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let forward = direction.normalize();
    let right = up.cross(forward).normalize();
    let up = forward.cross(right);

    #[rustfmt::skip]
    let view = Matrix4::new(
        right.x, up.x, forward.x, 0.0,
        right.y, up.y, forward.y, 0.0,
        right.z, up.z, forward.z, 0.0,
        -eye.dot(right), -eye.dot(up), -eye.dot(forward), 1.0,
    );
    view
}

/// Left-handed perspective projection mapping view depth `near..far` onto `0..1`,
/// the clip-space depth range wgpu expects.
pub fn perspective_lh(fovy: Rad<f32>, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let y_scale = 1.0 / (fovy.0 * 0.5).tan();
    let x_scale = y_scale / aspect;
    let range = far / (far - near);

    #[rustfmt::skip]
    let projection = Matrix4::new(
        x_scale, 0.0, 0.0, 0.0,
        0.0, y_scale, 0.0, 0.0,
        0.0, 0.0, range, 1.0,
        0.0, 0.0, -near * range, 0.0,
    );
    projection
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}
