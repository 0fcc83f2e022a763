//! End-to-end frame and teardown scenarios on the headless backend.

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use scenery::gfx::camera::{convert_matrix4_to_array, Camera, CameraConfig};
use scenery::gfx::device::{GraphicsDevice, ParameterBlock, ShaderDescriptor, ShaderStage};
use scenery::gfx::geometry::{cube, triangle};
use scenery::gfx::headless::{HeadlessDevice, RecordedCall, RecordingContext};
use scenery::gfx::rendering::FrameRenderer;
use scenery::gfx::resources::{Material, ShaderPair, VertexParameters};
use scenery::gfx::scene::{Entity, Light, Mesh, Scene};

fn shader_pair(device: &HeadlessDevice) -> ShaderPair {
    let vs = device
        .create_shader(&ShaderDescriptor {
            label: "vs",
            stage: ShaderStage::Vertex,
            source: "// vertex",
        })
        .unwrap();
    let ps = device
        .create_shader(&ShaderDescriptor {
            label: "ps",
            stage: ShaderStage::Pixel,
            source: "// pixel",
        })
        .unwrap();
    ShaderPair::new(device, vs, ps).unwrap()
}

fn material(device: &HeadlessDevice) -> Material {
    Material::new(
        "plain",
        Vector4::new(1.0, 1.0, 1.0, 1.0),
        32.0,
        shader_pair(device),
    )
}

/// `count` entities over `mesh_count` shared cube meshes.
fn populated_scene(device: &Arc<HeadlessDevice>, count: usize, mesh_count: usize) -> Scene {
    let shared: Arc<dyn GraphicsDevice> = device.clone();
    let mut scene = Scene::new(Camera::new(CameraConfig::default()));
    let material = scene.add_material(material(device));
    let meshes: Vec<_> = (0..mesh_count)
        .map(|i| {
            scene.add_mesh(
                Mesh::from_geometry(shared.clone(), &format!("cube {}", i), &cube(1.0)).unwrap(),
            )
        })
        .collect();

    for i in 0..count {
        let mesh = meshes[i % mesh_count].clone();
        let mut entity = Entity::new(mesh, material.clone());
        entity
            .transform_mut()
            .set_position(Vector3::new(i as f32, 0.0, 5.0));
        scene.spawn(entity);
    }
    scene
}

#[test]
fn test_single_triangle_frame() {
    let device = Arc::new(HeadlessDevice::new());
    let shared: Arc<dyn GraphicsDevice> = device.clone();
    let mut scene = Scene::new(Camera::new(CameraConfig::default()));
    let material = scene.add_material(material(&device));
    let mesh = scene.add_mesh(Mesh::from_geometry(shared, "triangle", &triangle()).unwrap());

    let mut entity = Entity::new(mesh, material);
    entity
        .transform_mut()
        .set_position(Vector3::new(1.0, 2.0, 3.0));
    scene.spawn(entity);
    scene
        .lights_mut()
        .push(Light::ambient(Vector3::new(1.0, 1.0, 1.0), 0.5))
        .unwrap();

    let mut renderer = FrameRenderer::default();
    let mut ctx = RecordingContext::new();
    let stats = renderer.render_frame(&mut ctx, &mut scene).unwrap();

    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.indices_submitted, 3);
    assert_eq!(ctx.draw_calls(), vec![(3, 0, 0)]);

    let writes = ctx.parameter_writes(ShaderStage::Vertex, ParameterBlock::PerDraw);
    assert_eq!(writes.len(), 1);
    let uploaded: VertexParameters = bytemuck::pod_read_unaligned(writes[0]);
    let expected = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(uploaded.world, convert_matrix4_to_array(expected));
    assert_eq!(uploaded.view, convert_matrix4_to_array(Matrix4::identity()));
    assert_eq!(
        uploaded.projection,
        convert_matrix4_to_array(scene.camera().projection_matrix())
    );

    // The draw is the last thing before presenting
    let calls = ctx.calls();
    let draw = calls
        .iter()
        .position(|c| matches!(c, RecordedCall::DrawIndexed { .. }))
        .unwrap();
    assert_eq!(calls[draw + 1], RecordedCall::Present);
}

#[test]
fn test_moved_entity_uploads_new_matrix_next_frame() {
    let device = Arc::new(HeadlessDevice::new());
    let mut scene = populated_scene(&device, 1, 1);
    let mut renderer = FrameRenderer::default();
    let mut ctx = RecordingContext::new();

    renderer.render_frame(&mut ctx, &mut scene).unwrap();
    scene.entities_mut()[0]
        .transform_mut()
        .set_position(Vector3::new(-2.0, 0.0, 0.0));
    renderer.render_frame(&mut ctx, &mut scene).unwrap();

    let writes = ctx.parameter_writes(ShaderStage::Vertex, ParameterBlock::PerDraw);
    assert_eq!(writes.len(), 2);
    let second: VertexParameters = bytemuck::pod_read_unaligned(writes[1]);
    assert_eq!(
        second.world,
        convert_matrix4_to_array(Matrix4::from_translation(Vector3::new(-2.0, 0.0, 0.0)))
    );
}

#[test]
fn test_shared_meshes_release_each_buffer_once_in_any_order() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..10 {
        let device = Arc::new(HeadlessDevice::new());
        let mut scene = populated_scene(&device, 8, 3);
        assert_eq!(device.live_buffer_count(), 6);

        let mut ids: Vec<_> = scene.entities().iter().map(|e| e.id()).collect();
        ids.shuffle(&mut rng);
        let mut despawned: Vec<Entity> = ids.iter().filter_map(|id| scene.despawn(*id)).collect();
        drop(scene);

        // The scene's mesh list is gone; entities keep the buffers alive
        assert_eq!(device.live_buffer_count(), 6);

        despawned.shuffle(&mut rng);
        drop(despawned);

        let mut destroyed = device.destroyed_buffers();
        assert_eq!(destroyed.len(), 6);
        destroyed.sort();
        destroyed.dedup();
        assert_eq!(destroyed.len(), 6);
        assert_eq!(device.live_buffer_count(), 0);
        assert_eq!(device.rejected_destroy_count(), 0);
    }
}

#[test]
fn test_parallel_teardown_releases_each_buffer_once() {
    let device = Arc::new(HeadlessDevice::new());
    let scene = populated_scene(&device, 32, 4);
    assert_eq!(device.live_buffer_count(), 8);

    scene.teardown_parallel();

    assert_eq!(device.live_buffer_count(), 0);
    assert_eq!(device.destroyed_buffers().len(), 8);
    assert_eq!(device.rejected_destroy_count(), 0);
}

#[test]
fn test_entities_dropped_across_threads() {
    let device = Arc::new(HeadlessDevice::new());
    let mut scene = populated_scene(&device, 12, 5);
    let ids: Vec<_> = scene.entities().iter().map(|e| e.id()).collect();
    let mut entities: Vec<Entity> = ids.iter().filter_map(|id| scene.despawn(*id)).collect();
    drop(scene);

    std::thread::scope(|s| {
        while !entities.is_empty() {
            let chunk: Vec<Entity> = entities.drain(..entities.len().min(3)).collect();
            s.spawn(move || drop(chunk));
        }
    });

    assert_eq!(device.live_buffer_count(), 0);
    assert_eq!(device.destroyed_buffers().len(), 10);
    assert_eq!(device.rejected_destroy_count(), 0);
}
