#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use cgmath::{Matrix4, Vector2, Vector3, Vector4};
use desk_scene::{ShaderUniforms, ShapeKind, ShapeMeshes, TextureBackend, TextureHandle};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Mat4(Matrix4<f32>),
    Vec4(Vector4<f32>),
    Vec3(Vector3<f32>),
    Vec2(Vector2<f32>),
    Float(f32),
    Int(i32),
}

impl Value {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Uniform(String, Value),
    LoadMesh(ShapeKind),
    DrawMesh(ShapeKind),
    CreateTexture(String, TextureHandle),
    BindTexture(usize, TextureHandle),
    ReleaseTexture(TextureHandle),
}

/// A draw together with every uniform value that was current when it was issued.
#[derive(Clone, Debug)]
pub struct Draw {
    pub kind: ShapeKind,
    pub uniforms: HashMap<String, Value>,
}

impl Draw {
    pub fn int(&self, name: &str) -> Option<i32> {
        self.uniforms.get(name).and_then(Value::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.uniforms.get(name).and_then(Value::as_float)
    }

    pub fn model(&self) -> Option<Matrix4<f32>> {
        match self.uniforms.get("model") {
            Some(Value::Mat4(m)) => Some(*m),
            _ => None,
        }
    }

    pub fn color(&self) -> Option<Vector4<f32>> {
        match self.uniforms.get("objectColor") {
            Some(Value::Vec4(c)) => Some(*c),
            _ => None,
        }
    }
}

/// Backend that records every call instead of touching a GPU.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    next_handle: u32,
    /// `load_mesh` fails for this kind.
    pub failing_mesh: Option<ShapeKind>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays the recorded calls and snapshots the uniforms at every draw.
    pub fn draws(&self) -> Vec<Draw> {
        let mut current = HashMap::new();
        let mut draws = Vec::new();
        for call in &self.calls {
            match call {
                Call::Uniform(name, value) => {
                    current.insert(name.clone(), value.clone());
                }
                Call::DrawMesh(kind) => draws.push(Draw {
                    kind: *kind,
                    uniforms: current.clone(),
                }),
                _ => {}
            }
        }
        draws
    }

    pub fn uniform_writes(&self) -> Vec<(&str, &Value)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Uniform(name, value) => Some((name.as_str(), value)),
                _ => None,
            })
            .collect()
    }

    pub fn loaded_meshes(&self) -> Vec<ShapeKind> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::LoadMesh(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    pub fn created_textures(&self) -> Vec<(String, TextureHandle)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateTexture(tag, handle) => Some((tag.clone(), *handle)),
                _ => None,
            })
            .collect()
    }

    pub fn released_textures(&self) -> Vec<TextureHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::ReleaseTexture(handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, name: &str, value: Value) {
        self.calls.push(Call::Uniform(name.to_string(), value));
    }
}

impl ShaderUniforms for RecordingBackend {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.record(name, Value::Mat4(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.record(name, Value::Vec4(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.record(name, Value::Vec3(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.record(name, Value::Vec2(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.record(name, Value::Float(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.record(name, Value::Int(value));
    }

    fn set_sampler(&mut self, name: &str, slot: i32) {
        self.record(name, Value::Int(slot));
    }
}

impl ShapeMeshes for RecordingBackend {
    fn load_mesh(&mut self, kind: ShapeKind) -> anyhow::Result<()> {
        if self.failing_mesh == Some(kind) {
            anyhow::bail!("{kind} refused to load");
        }
        self.calls.push(Call::LoadMesh(kind));
        Ok(())
    }

    fn draw_mesh(&mut self, kind: ShapeKind) {
        self.calls.push(Call::DrawMesh(kind));
    }
}

impl TextureBackend for RecordingBackend {
    fn create_texture(&mut self, tag: &str, _image: &image::RgbaImage) -> anyhow::Result<TextureHandle> {
        // start at 1 so handles never coincide with slots
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        self.calls.push(Call::CreateTexture(tag.to_string(), handle));
        Ok(handle)
    }

    fn bind_texture(&mut self, slot: usize, handle: TextureHandle) {
        self.calls.push(Call::BindTexture(slot, handle));
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.calls.push(Call::ReleaseTexture(handle));
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("desk-scene-{}-{}", name, std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("could not clear temp dir");
    }
    std::fs::create_dir_all(&dir).expect("could not create temp dir");
    dir
}

pub fn write_rgb_image(path: &Path, rgb: [u8; 3]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("could not create image dir");
    }
    image::RgbImage::from_pixel(8, 8, image::Rgb(rgb))
        .save(path)
        .expect("could not write test image");
}

pub fn write_rgba_image(path: &Path, rgba: [u8; 4]) {
    image::RgbaImage::from_pixel(8, 8, image::Rgba(rgba))
        .save(path)
        .expect("could not write test image");
}

pub fn write_gray_image(path: &Path) {
    image::GrayImage::from_pixel(8, 8, image::Luma([128]))
        .save(path)
        .expect("could not write test image");
}

/// Asset folder with a `textures/<tag>.jpg` for every tag.
pub fn asset_root_with_textures(name: &str, tags: &[&str]) -> PathBuf {
    let root = temp_dir(name);
    for (i, tag) in tags.iter().enumerate() {
        let shade = (i as u8).wrapping_mul(29);
        write_rgb_image(&root.join("textures").join(format!("{tag}.jpg")), [shade, 200, 255 - shade]);
    }
    root
}

pub fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-5, "{a} != {b}");
}

pub fn assert_matrix_close(a: Matrix4<f32>, b: Matrix4<f32>) {
    let a: [[f32; 4]; 4] = a.into();
    let b: [[f32; 4]; 4] = b.into();
    for (col_a, col_b) in a.iter().zip(b.iter()) {
        for (x, y) in col_a.iter().zip(col_b.iter()) {
            assert!((x - y).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }
}
