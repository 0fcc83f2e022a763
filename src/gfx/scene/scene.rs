use std::sync::Arc;

use crate::gfx::camera::Camera;
use crate::gfx::resources::material::Material;
use crate::gfx::scene::entity::{Entity, EntityId};
use crate::gfx::scene::light::LightCollection;
use crate::gfx::scene::mesh::Mesh;

/// Scene container
///
/// Holds the camera, the lights, the shared meshes and materials, and the
/// entities in submission order. Meshes and materials registered here stay
/// alive as long as the scene, even when no entity references them.
#[derive(Debug)]
pub struct Scene {
    camera: Camera,
    lights: LightCollection,
    meshes: Vec<Arc<Mesh>>,
    materials: Vec<Arc<Material>>,
    entities: Vec<Entity>,
}

/// Counts reported by [`Scene::statistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneStatistics {
    pub entity_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub light_count: usize,
    /// Indices drawn per frame if every entity is drawn once.
    pub total_indices: u64,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            lights: LightCollection::new(),
            meshes: Vec::new(),
            materials: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Registers a mesh and returns the shared handle entities draw with.
    pub fn add_mesh(&mut self, mesh: Mesh) -> Arc<Mesh> {
        let mesh = Arc::new(mesh);
        self.meshes.push(mesh.clone());
        mesh
    }

    /// Registers a material and returns the shared handle entities draw with.
    pub fn add_material(&mut self, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        self.materials.push(material.clone());
        material
    }

    /// Appends an entity to the draw list.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        log::debug!("Spawned entity {:?} ({})", id, entity.name().unwrap_or("unnamed"));
        self.entities.push(entity);
        id
    }

    /// Removes an entity, keeping the order of the rest.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id() == id)?;
        Some(self.entities.remove(index))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == Some(name))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn lights(&self) -> &LightCollection {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightCollection {
        &mut self.lights
    }

    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Arc<Material>] {
        &self.materials
    }

    /// Borrows what a frame needs at once: the camera and lights to read, the
    /// entities to draw.
    pub fn frame_parts(&mut self) -> (&Camera, &LightCollection, &mut [Entity]) {
        (&self.camera, &self.lights, &mut self.entities)
    }

    /// Updates the camera projection for a new output size. Zero-sized outputs
    /// (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera
            .update_projection_matrix(width as f32 / height as f32);
    }

    pub fn statistics(&self) -> SceneStatistics {
        SceneStatistics {
            entity_count: self.entities.len(),
            mesh_count: self.meshes.len(),
            material_count: self.materials.len(),
            light_count: self.lights.len(),
            total_indices: self
                .entities
                .iter()
                .map(|e| e.mesh().index_count() as u64)
                .sum(),
        }
    }

    /// Drops the entities, materials and meshes on separate threads.
    ///
    /// Mesh buffers are released once, by whichever thread drops the last
    /// reference.
    pub fn teardown_parallel(self) {
        let Scene {
            entities,
            materials,
            meshes,
            ..
        } = self;

        std::thread::scope(|scope| {
            scope.spawn(move || drop(entities));
            scope.spawn(move || drop(materials));
            scope.spawn(move || drop(meshes));
        });
    }
}
