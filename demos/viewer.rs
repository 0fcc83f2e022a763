//! # Viewer
//!
//! Flies a camera over the basic geometry scene while a patrolling cube walks
//! its route and chases the camera when it comes close.
//!
//! Controls:
//! - W/A/S/D: move
//! - Space / X: up / down
//! - Left mouse + drag: look around
//! - Escape: quit
//!
//! Pass an OBJ path as the first argument to add a model at the origin.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use scenery::gfx::scene::EntityId;
use scenery::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let model_path = std::env::args().nth(1);
    let ghost: Rc<RefCell<Option<EntityId>>> = Rc::new(RefCell::new(None));
    let ghost_setup = ghost.clone();

    let route = vec![
        Vector3::new(-4.0, 0.5, 4.0),
        Vector3::new(4.0, 0.5, 4.0),
        Vector3::new(4.0, 0.5, 12.0),
        Vector3::new(-4.0, 0.5, 12.0),
    ];
    let mut patrol = PatrolController::new(route.clone(), PatrolConfig::default());
    let lamp_position = Vector3::new(0.0, 3.0, 8.0);
    let lamp_range = 6.0;

    let camera = CameraConfig::default()
        .with_position(Vector3::new(0.0, 2.0, -6.0))
        .with_rotation(Vector3::new(0.2, 0.0, 0.0))
        .with_fov(Deg(60.0));

    App::new(
        AppConfig::default()
            .with_title("Scenery Viewer")
            .with_camera(camera),
    )?
    .with_setup(move |device, scene| {
        let device: Arc<dyn GraphicsDevice> = device;
        let shaders = basic_shader_pair(&*device)?;

        let white = scene.add_material(Material::new(
            "white",
            Vector4::new(1.0, 1.0, 1.0, 1.0),
            64.0,
            shaders,
        ));
        let red = scene.add_material(Material::new(
            "red",
            Vector4::new(1.0, 0.2, 0.2, 1.0),
            16.0,
            shaders,
        ));
        let blue = scene.add_material(Material::new(
            "blue",
            Vector4::new(0.2, 0.3, 1.0, 1.0),
            8.0,
            shaders,
        ));

        let triangle_mesh = scene.add_mesh(Mesh::from_geometry(device.clone(), "triangle", &triangle())?);
        let quad_mesh = scene.add_mesh(Mesh::from_geometry(device.clone(), "quad", &quad())?);
        let house_mesh = scene.add_mesh(Mesh::from_geometry(device.clone(), "house", &house())?);
        let cube_mesh = scene.add_mesh(Mesh::from_geometry(device.clone(), "cube", &cube(1.0))?);

        // Two entities per shared mesh
        for (i, x) in [-3.0f32, 3.0].into_iter().enumerate() {
            let mut tri = Entity::new(triangle_mesh.clone(), red.clone()).with_name(format!("triangle {}", i));
            tri.transform_mut().set_position(Vector3::new(x, 1.5, 2.0));

            let mut house = Entity::new(house_mesh.clone(), blue.clone()).with_name(format!("house {}", i));
            house.transform_mut().set_position(Vector3::new(x, 0.0, 6.0));
            house.transform_mut().set_scale(Vector3::new(2.0, 2.0, 2.0));

            scene.spawn(tri);
            scene.spawn(house);
        }

        // The quad faces -Z; tip it forward to make a floor
        let mut floor = Entity::new(quad_mesh, white.clone()).with_name("floor");
        floor.transform_mut().set_rotation(Vector3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0));
        floor.transform_mut().set_scale(Vector3::new(20.0, 20.0, 1.0));
        floor.transform_mut().set_position(Vector3::new(0.0, -0.5, 8.0));
        scene.spawn(floor);

        let mut ghost_entity = Entity::new(cube_mesh, red).with_name("ghost");
        ghost_entity.transform_mut().set_position(route[0]);
        *ghost_setup.borrow_mut() = Some(scene.spawn(ghost_entity));

        if let Some(path) = &model_path {
            let model = scene.add_mesh(Mesh::from_obj(device.clone(), path)?);
            scene.spawn(Entity::new(model, white).with_name("model"));
        }

        let lights = scene.lights_mut();
        lights.push(Light::ambient(Vector3::new(1.0, 1.0, 1.0), 0.15))?;
        lights.push(Light::directional(
            Vector3::new(0.3, -1.0, 0.5),
            Vector3::new(1.0, 0.95, 0.9),
            0.6,
        ))?;
        lights.push(Light::point(lamp_position, lamp_range, Vector3::new(1.0, 0.8, 0.4), 1.5))?;
        lights.push(Light::spot(
            Vector3::new(0.0, 6.0, 2.0),
            Vector3::new(0.0, -1.0, 0.3),
            15.0,
            8.0,
            Vector3::new(0.6, 0.8, 1.0),
            1.0,
        ))?;
        Ok(())
    })
    .with_update(move |scene, _input, dt| {
        let Some(id) = *ghost.borrow() else {
            return;
        };
        let player = scene.camera().position();
        let player_lit = (player - lamp_position).magnitude() < lamp_range;

        if let Some(entity) = scene.entity_mut(id) {
            patrol.update(entity.transform_mut(), player, player_lit, dt);
            entity.transform_mut().rotate(Vector3::new(0.0, dt, 0.0));
        }
    })
    .run()?;

    Ok(())
}
