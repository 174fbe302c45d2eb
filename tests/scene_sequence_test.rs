use cgmath::{Angle, Deg, Vector4};
use desk_scene::{
    SceneManager, ShapeKind, Transform,
    scene::{DRAWS_PER_FRAME, LEAF_COUNT, SCENE_MESHES, SCENE_TEXTURES, leaf_transform},
    shader,
};

use crate::common::test_utils::{
    Call, Draw, RecordingBackend, asset_root_with_textures, assert_close, assert_matrix_close,
    temp_dir,
};

mod common;

fn prepared_scene(name: &str) -> (SceneManager, RecordingBackend) {
    let root = asset_root_with_textures(name, &SCENE_TEXTURES);
    let mut backend = RecordingBackend::new();
    let mut scene = SceneManager::new();
    scene.prepare_scene(&mut backend, &root).unwrap();
    (scene, backend)
}

fn render_once(scene: &SceneManager, backend: &mut RecordingBackend) -> Vec<Draw> {
    backend.clear();
    scene.render_scene(backend);
    backend.draws()
}

#[test]
fn prepare_loads_every_mesh_once_in_order() {
    let (_, backend) = prepared_scene("mesh-order");
    assert_eq!(backend.loaded_meshes(), SCENE_MESHES.to_vec());
}

#[test]
fn prepare_creates_and_binds_textures_in_tag_order() {
    let (scene, backend) = prepared_scene("texture-order");

    let created = backend.created_textures();
    let tags: Vec<&str> = created.iter().map(|(tag, _)| tag.as_str()).collect();
    assert_eq!(tags, SCENE_TEXTURES.to_vec());

    let binds: Vec<&Call> = backend
        .calls
        .iter()
        .filter(|call| matches!(call, Call::BindTexture(..)))
        .collect();
    assert_eq!(binds.len(), SCENE_TEXTURES.len());
    for (slot, (call, (_, handle))) in binds.iter().zip(created.iter()).enumerate() {
        assert_eq!(**call, Call::BindTexture(slot, *handle));
    }

    assert_eq!(scene.textures().find_texture_slot("leaf"), 3);
    assert_eq!(scene.materials().len(), 5);
}

#[test]
fn one_frame_issues_twenty_draws_in_scene_order() {
    let (scene, mut backend) = prepared_scene("draw-order");
    let draws = render_once(&scene, &mut backend);
    assert_eq!(draws.len(), DRAWS_PER_FRAME);
    assert_eq!(DRAWS_PER_FRAME, 20);

    let mut expected = vec![
        ShapeKind::Plane,
        ShapeKind::Plane,
        ShapeKind::Cylinder,
        ShapeKind::Cylinder,
        ShapeKind::TaperedCylinder,
        ShapeKind::Sphere,
        ShapeKind::Cylinder,
        ShapeKind::Cylinder,
        ShapeKind::Cylinder,
        ShapeKind::Sphere,
    ];
    expected.extend(std::iter::repeat_n(ShapeKind::TaperedCylinder, LEAF_COUNT));
    let kinds: Vec<ShapeKind> = draws.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, expected);
}

#[test]
fn fixed_objects_are_placed_with_their_transforms() {
    // scale, rotation (degrees), position
    let placements: [([f32; 3], [f32; 3], [f32; 3]); 10] = [
        ([40.0, 1.0, 40.0], [-90.0, 0.0, 0.0], [0.0, 4.0, -10.0]),
        ([20.0, 1.0, 20.0], [0.0, 0.0, 0.0], [0.0, -0.5, 0.0]),
        ([1.5, 0.2, 1.5], [0.0, 0.0, 0.0], [5.0, 0.0, 0.0]),
        ([0.05, 4.0, 0.05], [0.0, 0.0, 0.0], [6.0, 0.0, 0.0]),
        ([1.2, 1.5, 1.2], [-45.0, 0.0, 0.0], [5.5, 3.8, 0.0]),
        ([0.2, 0.2, 0.2], [0.0, 0.0, 0.0], [5.5, 3.6, 0.0]),
        ([0.15, 0.3, 0.15], [0.0, 0.0, 90.0], [6.0, 4.0, -0.2]),
        ([1.6, 0.05, 1.6], [90.0, 0.0, 0.0], [-2.0, 7.0, -4.95]),
        ([1.5, 0.1, 1.5], [90.0, 0.0, 0.0], [-2.0, 7.0, -4.9]),
        ([1.2, 1.0, 1.2], [0.0, 0.0, 0.0], [2.0, 0.5, 0.0]),
    ];

    let (scene, mut backend) = prepared_scene("placements");
    let draws = render_once(&scene, &mut backend);
    for (i, (scale, rotation, position)) in placements.into_iter().enumerate() {
        let expected = Transform::from_parts(scale, rotation, position).to_matrix();
        assert_matrix_close(draws[i].model().unwrap(), expected);
    }
}

#[test]
fn frames_are_identical() {
    let (scene, mut backend) = prepared_scene("repeat");
    render_once(&scene, &mut backend);
    let first = backend.calls.clone();
    render_once(&scene, &mut backend);
    assert_eq!(backend.calls, first);
}

#[test]
fn lights_are_written_before_the_first_draw() {
    let (scene, mut backend) = prepared_scene("lights");
    let draws = render_once(&scene, &mut backend);
    let first = &draws[0];
    assert_eq!(first.int(shader::USE_LIGHTING), Some(1));
    assert_close(first.float(shader::SPOT_LIGHT_CUT_OFF).unwrap(), Deg(15.0f32).cos());
    assert_close(first.float(shader::SPOT_LIGHT_OUTER_CUT_OFF).unwrap(), Deg(25.0f32).cos());
    assert_close(first.float(shader::SPOT_LIGHT_LINEAR).unwrap(), 0.045);
}

#[test]
fn wall_and_desk_shading() {
    let (scene, mut backend) = prepared_scene("wall-desk");
    let draws = render_once(&scene, &mut backend);

    let wall = &draws[0];
    assert_eq!(wall.int(shader::USE_TEXTURE), Some(1));
    assert_eq!(wall.int(shader::OBJECT_TEXTURE), Some(1));
    assert_eq!(wall.float(shader::MATERIAL_SHININESS), Some(1.0));

    let desk = &draws[1];
    assert_eq!(desk.int(shader::USE_TEXTURE), Some(0));
    assert_eq!(desk.color(), Some(Vector4::new(1.0, 1.0, 1.0, 1.0)));
}

#[test]
fn lamp_materials_and_bulb_colour() {
    let (scene, mut backend) = prepared_scene("lamp");
    let draws = render_once(&scene, &mut backend);

    assert_eq!(draws[2].float(shader::MATERIAL_SHININESS), Some(8.0));
    assert_eq!(draws[3].float(shader::MATERIAL_SHININESS), Some(2.0));

    let bulb = &draws[5];
    assert_eq!(bulb.kind, ShapeKind::Sphere);
    assert_eq!(bulb.int(shader::USE_TEXTURE), Some(0));
    assert_eq!(bulb.color(), Some(Vector4::new(1.0, 1.0, 0.0, 1.0)));

    // the joint only changes the material, the colour carries over
    let joint = &draws[6];
    assert_eq!(joint.float(shader::MATERIAL_SHININESS), Some(51.2));
    assert_eq!(joint.color(), bulb.color());
}

#[test]
fn clock_rim_is_coloured_and_face_is_textured() {
    let (scene, mut backend) = prepared_scene("clock");
    let draws = render_once(&scene, &mut backend);

    let rim = &draws[7];
    assert_eq!(rim.int(shader::USE_TEXTURE), Some(0));
    assert_eq!(rim.color(), Some(Vector4::new(0.2, 0.2, 0.2, 1.0)));
    assert_eq!(rim.float(shader::MATERIAL_SHININESS), Some(16.0));

    let face = &draws[8];
    assert_eq!(face.int(shader::USE_TEXTURE), Some(1));
    assert_eq!(face.int(shader::OBJECT_TEXTURE), Some(0));
}

#[test]
fn leaves_use_the_leaf_texture_and_their_own_transforms() {
    let (scene, mut backend) = prepared_scene("leaves");
    let draws = render_once(&scene, &mut backend);

    let pot = &draws[9];
    assert_eq!(pot.int(shader::USE_TEXTURE), Some(0));
    assert_eq!(pot.color(), Some(Vector4::new(0.8, 0.8, 0.8, 1.0)));

    for (i, leaf) in draws[10..].iter().enumerate() {
        assert_eq!(leaf.kind, ShapeKind::TaperedCylinder);
        assert_eq!(leaf.int(shader::USE_TEXTURE), Some(1));
        assert_eq!(leaf.int(shader::OBJECT_TEXTURE), Some(3));
        assert_matrix_close(leaf.model().unwrap(), leaf_transform(i, LEAF_COUNT).to_matrix());
    }
}

#[test]
fn leaf_transforms_fan_out_around_the_pot() {
    let first = leaf_transform(0, LEAF_COUNT);
    let fourth = leaf_transform(3, LEAF_COUNT);
    let second = leaf_transform(1, LEAF_COUNT);

    assert_close(first.scale.y, 1.5);
    assert_close(second.scale.y, 1.7);
    assert_close(fourth.scale.y, 1.5);
    assert_close(fourth.rotation.y, 108.0);
    assert_close(second.rotation.x, 23.0);
    assert_close(first.rotation.z, 5.0);
    assert_close(second.rotation.z, -5.0);
    assert_eq!(first.position, second.position);
}

#[test]
fn missing_textures_still_render_a_full_frame() {
    let root = temp_dir("no-assets");
    let mut backend = RecordingBackend::new();
    let mut scene = SceneManager::new();
    scene.prepare_scene(&mut backend, &root).unwrap();

    assert!(backend.created_textures().is_empty());
    assert!(scene.textures().is_empty());

    let draws = render_once(&scene, &mut backend);
    assert_eq!(draws.len(), DRAWS_PER_FRAME);
    assert_eq!(draws[0].int(shader::USE_TEXTURE), Some(1));
    assert_eq!(draws[0].int(shader::OBJECT_TEXTURE), Some(-1));
}

#[test]
fn mesh_failure_aborts_preparation() {
    let root = temp_dir("mesh-failure");
    let mut backend = RecordingBackend::new();
    backend.failing_mesh = Some(ShapeKind::Torus);
    let mut scene = SceneManager::new();

    assert!(scene.prepare_scene(&mut backend, &root).is_err());
    assert!(!backend.loaded_meshes().contains(&ShapeKind::Torus));
    assert!(!backend.loaded_meshes().contains(&ShapeKind::TaperedCylinder));
}

#[test]
fn destroy_releases_every_scene_texture() {
    let (mut scene, mut backend) = prepared_scene("teardown");
    let handles: Vec<_> = backend.created_textures().into_iter().map(|(_, h)| h).collect();
    backend.clear();

    scene.destroy_textures(&mut backend);
    assert_eq!(backend.released_textures(), handles);
    assert!(scene.textures().is_empty());
}
