//! Spatial state with a lazily recomputed world matrix.
//!
//! A [`Transform`] stores position, rotation and scale and caches the world
//! matrix built from them. Every mutator marks the cache dirty; the matrix is
//! rebuilt on the next [`Transform::world_matrix`] call and only then.

use cgmath::{
    InnerSpace, Matrix4, One, Quaternion, Rad, Rotation, Rotation3, SquareMatrix, Vector3, Zero,
};

/// Position, rotation and non-uniform scale of one object.
///
/// Rotation is kept both as pitch/yaw/roll Euler angles (radians) and as the
/// equivalent orientation quaternion. The world matrix applies scale first,
/// then rotation, then translation.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vector3<f32>,
    pitch_yaw_roll: Vector3<f32>,
    orientation: Quaternion<f32>,
    scale: Vector3<f32>,

    world_matrix: Matrix4<f32>,
    dirty: bool,
    recomputations: u64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Identity pose: origin, no rotation, unit scale.
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            pitch_yaw_roll: Vector3::zero(),
            orientation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            world_matrix: Matrix4::identity(),
            dirty: false,
            recomputations: 0,
        }
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.mark_dirty();
    }

    /// Sets pitch (X), yaw (Y) and roll (Z) in radians.
    pub fn set_rotation(&mut self, pitch_yaw_roll: Vector3<f32>) {
        self.pitch_yaw_roll = pitch_yaw_roll;
        self.sync_orientation();
        self.mark_dirty();
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        self.mark_dirty();
    }

    /// Translates in world space.
    pub fn move_absolute(&mut self, offset: Vector3<f32>) {
        self.position += offset;
        self.mark_dirty();
    }

    /// Translates along the transform's own axes.
    pub fn move_relative(&mut self, offset: Vector3<f32>) {
        self.position += self.orientation.rotate_vector(offset);
        self.mark_dirty();
    }

    /// Adds to pitch, yaw and roll.
    pub fn rotate(&mut self, delta: Vector3<f32>) {
        self.pitch_yaw_roll += delta;
        self.sync_orientation();
        self.mark_dirty();
    }

    /// Multiplies the current scale component-wise.
    pub fn scale_by(&mut self, factors: Vector3<f32>) {
        self.scale = Vector3::new(
            self.scale.x * factors.x,
            self.scale.y * factors.y,
            self.scale.z * factors.z,
        );
        self.mark_dirty();
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn pitch_yaw_roll(&self) -> Vector3<f32> {
        self.pitch_yaw_roll
    }

    pub fn orientation(&self) -> Quaternion<f32> {
        self.orientation
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// Returns the world matrix, rebuilding it first if any component changed
    /// since the last call.
    pub fn world_matrix(&mut self) -> Matrix4<f32> {
        if self.dirty {
            self.world_matrix = compose_world_matrix(self.position, self.orientation, self.scale);
            self.dirty = false;
            self.recomputations += 1;
        }
        self.world_matrix
    }

    /// True when the cached world matrix no longer reflects the pose.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// How many times the world matrix has been rebuilt.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn distance_squared_to(&self, point: Vector3<f32>) -> f32 {
        (point - self.position).magnitude2()
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn sync_orientation(&mut self) {
        self.orientation = orientation_from_pitch_yaw_roll(self.pitch_yaw_roll);
    }
}

/// Quaternion applying roll (Z), then pitch (X), then yaw (Y).
pub fn orientation_from_pitch_yaw_roll(pitch_yaw_roll: Vector3<f32>) -> Quaternion<f32> {
    let pitch = Quaternion::from_angle_x(Rad(pitch_yaw_roll.x));
    let yaw = Quaternion::from_angle_y(Rad(pitch_yaw_roll.y));
    let roll = Quaternion::from_angle_z(Rad(pitch_yaw_roll.z));
    yaw * pitch * roll
}

/// World matrix for a pose: scale, then rotate, then translate.
pub fn compose_world_matrix(
    position: Vector3<f32>,
    orientation: Quaternion<f32>,
    scale: Vector3<f32>,
) -> Matrix4<f32> {
    let translation = Matrix4::from_translation(position);
    let rotation = Matrix4::from(orientation);
    let scaling = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    translation * rotation * scaling
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_matrix_near(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: &[f32; 16] = a.as_ref();
        let b: &[f32; 16] = b.as_ref();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5, "{:?} != {:?}", a, b);
        }
    }

    fn random_vector(rng: &mut StdRng) -> Vector3<f32> {
        Vector3::new(
            rng.random_range(-3.0..3.0),
            rng.random_range(-3.0..3.0),
            rng.random_range(-3.0..3.0),
        )
    }

    #[test]
    fn test_new_transform_is_identity_and_clean() {
        let mut transform = Transform::new();
        assert!(!transform.is_dirty());
        assert_eq!(transform.world_matrix(), Matrix4::identity());
        assert_eq!(transform.recomputations(), 0);
    }

    #[test]
    fn test_cache_is_observationally_transparent() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut transform = Transform::new();

        for _ in 0..200 {
            let mutations = rng.random_range(0..4);
            for _ in 0..mutations {
                match rng.random_range(0..7) {
                    0 => transform.set_position(random_vector(&mut rng)),
                    1 => transform.set_rotation(random_vector(&mut rng)),
                    2 => transform.set_scale(random_vector(&mut rng)),
                    3 => transform.move_absolute(random_vector(&mut rng)),
                    4 => transform.move_relative(random_vector(&mut rng)),
                    5 => transform.rotate(random_vector(&mut rng) * 0.1),
                    _ => transform.scale_by(Vector3::new(1.1, 0.9, 1.0)),
                }
            }

            let before = transform.recomputations();
            let first = transform.world_matrix();
            let expected = compose_world_matrix(
                transform.position(),
                transform.orientation(),
                transform.scale(),
            );
            assert_matrix_near(first, expected);

            // Repeated reads never rebuild and never change the result.
            let reads = rng.random_range(1..4);
            for _ in 0..reads {
                assert_eq!(transform.world_matrix(), first);
            }

            let rebuilt = transform.recomputations() - before;
            if mutations == 0 {
                assert_eq!(rebuilt, 0);
            } else {
                assert_eq!(rebuilt, 1);
            }
        }
    }

    #[test]
    fn test_mutation_burst_costs_one_recomputation() {
        let mut transform = Transform::new();
        transform.set_position(Vector3::new(1.0, 0.0, 0.0));
        transform.rotate(Vector3::new(0.1, 0.2, 0.3));
        transform.scale_by(Vector3::new(2.0, 2.0, 2.0));
        transform.move_absolute(Vector3::new(0.0, 1.0, 0.0));
        assert!(transform.is_dirty());

        transform.world_matrix();
        transform.world_matrix();
        assert_eq!(transform.recomputations(), 1);
        assert!(!transform.is_dirty());
    }

    #[test]
    fn test_absolute_scale_setter_is_idempotent() {
        let pose = |t: &mut Transform| {
            t.set_position(Vector3::new(4.0, -1.0, 2.5));
            t.set_rotation(Vector3::new(0.3, -1.2, 0.7));
        };

        let mut touched = Transform::new();
        pose(&mut touched);
        touched.set_scale(Vector3::new(2.0, 2.0, 2.0));
        touched.world_matrix();
        touched.set_scale(Vector3::new(1.0, 1.0, 1.0));

        let mut untouched = Transform::new();
        pose(&mut untouched);

        assert_matrix_near(touched.world_matrix(), untouched.world_matrix());
    }

    #[test]
    fn test_rotate_round_trip_restores_matrix() {
        let mut transform = Transform::new();
        transform.set_position(Vector3::new(1.0, 2.0, 3.0));
        transform.set_rotation(Vector3::new(0.2, 0.4, -0.1));
        let original = transform.world_matrix();

        transform.rotate(Vector3::new(0.75, 0.0, 0.0));
        assert!(transform.is_dirty());
        transform.rotate(Vector3::new(-0.75, 0.0, 0.0));

        assert_matrix_near(transform.world_matrix(), original);
    }

    #[test]
    fn test_move_relative_matches_move_absolute_without_rotation() {
        let offset = Vector3::new(0.5, -2.0, 7.25);

        let mut relative = Transform::new();
        relative.set_position(Vector3::new(1.0, 1.0, 1.0));
        relative.move_relative(offset);

        let mut absolute = Transform::new();
        absolute.set_position(Vector3::new(1.0, 1.0, 1.0));
        absolute.move_absolute(offset);

        assert_eq!(relative.position(), absolute.position());
        assert_eq!(relative.world_matrix(), absolute.world_matrix());
    }

    #[test]
    fn test_move_relative_follows_yaw() {
        let mut transform = Transform::new();
        transform.set_rotation(Vector3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        transform.move_relative(Vector3::new(0.0, 0.0, 1.0));

        // A quarter turn of yaw maps forward (+Z) onto +X.
        let position = transform.position();
        assert!((position.x - 1.0).abs() < 1e-5);
        assert!(position.z.abs() < 1e-5);
    }

    #[test]
    fn test_rotate_keeps_quaternion_in_sync() {
        let mut transform = Transform::new();
        transform.rotate(Vector3::new(0.1, 0.2, 0.3));
        transform.rotate(Vector3::new(0.1, 0.2, 0.3));

        let expected = orientation_from_pitch_yaw_roll(Vector3::new(0.2, 0.4, 0.6));
        let actual = transform.orientation();
        assert!((actual.s - expected.s).abs() < 1e-6);
        assert!((actual.v - expected.v).magnitude() < 1e-6);
    }

    #[test]
    fn test_set_position_and_scale_end_to_end() {
        let check = |mut transform: Transform| {
            let world = transform.world_matrix();
            assert_eq!(world * Vector4::new(0.0, 0.0, 0.0, 1.0), Vector4::new(1.0, 2.0, 3.0, 1.0));
            assert_eq!(world * Vector4::new(1.0, 0.0, 0.0, 0.0), Vector4::new(2.0, 0.0, 0.0, 0.0));
            assert_eq!(world * Vector4::new(0.0, 1.0, 0.0, 0.0), Vector4::new(0.0, 1.0, 0.0, 0.0));
        };

        let mut position_first = Transform::new();
        position_first.set_position(Vector3::new(1.0, 2.0, 3.0));
        position_first.set_scale(Vector3::new(2.0, 1.0, 1.0));
        check(position_first);

        let mut scale_first = Transform::new();
        scale_first.set_scale(Vector3::new(2.0, 1.0, 1.0));
        scale_first.set_position(Vector3::new(1.0, 2.0, 3.0));
        check(scale_first);
    }

    #[test]
    fn test_scale_is_applied_before_rotation() {
        let mut transform = Transform::new();
        transform.set_scale(Vector3::new(2.0, 1.0, 1.0));
        transform.set_rotation(Vector3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));

        // Local +X is stretched to length 2, then rolled onto +Y.
        let axis = transform.world_matrix() * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert!(axis.x.abs() < 1e-5);
        assert!((axis.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_distance_squared() {
        let mut transform = Transform::new();
        transform.set_position(Vector3::new(1.0, 2.0, 2.0));
        assert_eq!(transform.distance_squared_to(Vector3::zero()), 9.0);
    }
}
