//! Scene lights and the bounded collection uploaded once per frame.

use cgmath::{InnerSpace, Vector3};

use crate::error::SceneError;

/// Maximum number of lights a frame can upload.
pub const MAX_LIGHTS: usize = 16;

/// Light type tag. The discriminants are what the pixel program switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LightKind {
    Directional = 0,
    Point = 1,
    Spot = 2,
    Ambient = 3,
}

/// A single light.
///
/// Fields a kind doesn't use are ignored by the shading programs, e.g. the
/// direction of a point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vector3<f32>,
    pub intensity: f32,
    pub direction: Vector3<f32>,
    pub position: Vector3<f32>,
    pub range: f32,
    pub spot_falloff: f32,
}

impl Light {
    pub fn directional(direction: Vector3<f32>, color: Vector3<f32>, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
            direction: normalize_or_down(direction),
            position: Vector3::new(0.0, 0.0, 0.0),
            range: 0.0,
            spot_falloff: 0.0,
        }
    }

    pub fn point(position: Vector3<f32>, range: f32, color: Vector3<f32>, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            color,
            intensity,
            direction: Vector3::new(0.0, -1.0, 0.0),
            position,
            range: range.max(0.0),
            spot_falloff: 0.0,
        }
    }

    pub fn spot(
        position: Vector3<f32>,
        direction: Vector3<f32>,
        range: f32,
        spot_falloff: f32,
        color: Vector3<f32>,
        intensity: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot,
            color,
            intensity,
            direction: normalize_or_down(direction),
            position,
            range: range.max(0.0),
            spot_falloff: spot_falloff.max(0.0),
        }
    }

    pub fn ambient(color: Vector3<f32>, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            direction: Vector3::new(0.0, -1.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
            range: 0.0,
            spot_falloff: 0.0,
        }
    }
}

fn normalize_or_down(direction: Vector3<f32>) -> Vector3<f32> {
    if direction.magnitude2() > f32::EPSILON {
        direction.normalize()
    } else {
        Vector3::new(0.0, -1.0, 0.0)
    }
}

/// Up to [`MAX_LIGHTS`] lights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightCollection {
    lights: Vec<Light>,
}

impl LightCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a light, returning its slot.
    pub fn push(&mut self, light: Light) -> Result<usize, SceneError> {
        if self.lights.len() >= MAX_LIGHTS {
            return Err(SceneError::LightCapacity {
                capacity: MAX_LIGHTS,
            });
        }
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    /// Replaces every light in one go. Nothing changes if `lights` doesn't fit.
    pub fn replace_all(&mut self, lights: &[Light]) -> Result<(), SceneError> {
        if lights.len() > MAX_LIGHTS {
            return Err(SceneError::LightCapacity {
                capacity: MAX_LIGHTS,
            });
        }
        self.lights.clear();
        self.lights.extend_from_slice(lights);
        Ok(())
    }

    pub fn get(&self, slot: usize) -> Option<&Light> {
        self.lights.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Light> {
        self.lights.get_mut(slot)
    }

    pub fn remove(&mut self, slot: usize) -> Option<Light> {
        (slot < self.lights.len()).then(|| self.lights.remove(slot))
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub fn as_slice(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_point() -> Light {
        Light::point(Vector3::new(0.0, 2.0, 0.0), 10.0, Vector3::new(1.0, 1.0, 1.0), 1.0)
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut lights = LightCollection::new();
        for slot in 0..MAX_LIGHTS {
            assert_eq!(lights.push(white_point()).unwrap(), slot);
        }
        assert!(matches!(
            lights.push(white_point()),
            Err(SceneError::LightCapacity { capacity: MAX_LIGHTS })
        ));
        assert_eq!(lights.len(), MAX_LIGHTS);
    }

    #[test]
    fn test_replace_all_is_atomic() {
        let mut lights = LightCollection::new();
        lights.push(white_point()).unwrap();

        let too_many = vec![white_point(); MAX_LIGHTS + 1];
        assert!(lights.replace_all(&too_many).is_err());
        assert_eq!(lights.len(), 1);

        lights
            .replace_all(&[Light::ambient(Vector3::new(0.1, 0.1, 0.1), 1.0); 3])
            .unwrap();
        assert_eq!(lights.len(), 3);
        assert!(lights.iter().all(|l| l.kind == LightKind::Ambient));
    }

    #[test]
    fn test_directional_light_is_normalized() {
        let light = Light::directional(Vector3::new(0.0, -3.0, 4.0), Vector3::new(1.0, 1.0, 1.0), 1.0);
        assert!((light.direction.magnitude() - 1.0).abs() < 1e-6);

        let degenerate = Light::directional(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0), 1.0);
        assert_eq!(degenerate.direction, Vector3::new(0.0, -1.0, 0.0));
    }
}
