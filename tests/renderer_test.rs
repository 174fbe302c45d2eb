#[cfg(feature = "integration-tests")]
use desk_scene::{ShapeKind, ShapeMeshes, context::request_device, render::SceneRenderer};

#[cfg(feature = "integration-tests")]
fn with_renderer<F: FnOnce(&mut SceneRenderer)>(test: F) {
    let runtime = tokio::runtime::Runtime::new().expect("could not start tokio runtime");
    runtime.block_on(async move {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let (_adapter, device, queue) = request_device(&instance, None)
            .await
            .expect("no GPU device available");
        let mut renderer =
            SceneRenderer::new(&device, &queue, wgpu::TextureFormat::Rgba8UnormSrgb);
        test(&mut renderer);
    });
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_skip_draws_of_unloaded_meshes() {
    with_renderer(|renderer| {
        renderer.draw_mesh(ShapeKind::Torus);
        assert!(renderer.pending_draws().is_empty());

        renderer.load_mesh(ShapeKind::Torus).unwrap();
        renderer.draw_mesh(ShapeKind::Torus);
        renderer.draw_mesh(ShapeKind::Sphere);
        assert_eq!(renderer.pending_draws().len(), 1);
        assert_eq!(renderer.pending_draws()[0].kind, ShapeKind::Torus);
    });
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_snapshot_uniforms_per_draw() {
    use desk_scene::{ShaderUniforms, shader};

    with_renderer(|renderer| {
        renderer.load_mesh(ShapeKind::Box).unwrap();
        renderer.set_int(shader::OBJECT_TEXTURE, -1);
        renderer.draw_mesh(ShapeKind::Box);
        renderer.set_int(shader::OBJECT_TEXTURE, 4);
        renderer.draw_mesh(ShapeKind::Box);

        let slots: Vec<i32> = renderer
            .pending_draws()
            .iter()
            .map(|draw| draw.state.texture_slot)
            .collect();
        assert_eq!(slots, vec![-1, 4]);
    });
}
