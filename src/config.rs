//! Application settings.
//!
//! Everything has a sensible default; a few values can be overridden through
//! environment variables so the scene can be pointed at another asset folder
//! or window size without recompiling.

use std::path::PathBuf;

use cgmath::{Deg, Point3};

pub const ENV_ASSETS: &str = "DESK_SCENE_ASSETS";
pub const ENV_WIDTH: &str = "DESK_SCENE_WIDTH";
pub const ENV_HEIGHT: &str = "DESK_SCENE_HEIGHT";

#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Folder containing `textures/`.
    pub assets_root: PathBuf,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: wgpu::Color,
    pub camera_position: Point3<f32>,
    pub camera_yaw: Deg<f32>,
    pub camera_pitch: Deg<f32>,
    pub fovy: Deg<f32>,
    /// Units per second.
    pub camera_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("."),
            title: "Desk Scene".to_string(),
            width: 1000,
            height: 800,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
            camera_position: Point3::new(0.0, 5.0, 12.0),
            camera_yaw: Deg(-90.0),
            camera_pitch: Deg(-15.0),
            fovy: Deg(45.0),
            camera_speed: 5.0,
            mouse_sensitivity: 0.4,
        }
    }
}

impl SceneConfig {
    /// Defaults overridden by `DESK_SCENE_ASSETS`, `DESK_SCENE_WIDTH` and
    /// `DESK_SCENE_HEIGHT`. Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Self::default();
        if let Some(root) = lookup(ENV_ASSETS) {
            config.assets_root = PathBuf::from(root);
        }
        if let Some(width) = parse_dimension(ENV_WIDTH, lookup(ENV_WIDTH)) {
            config.width = width;
        }
        if let Some(height) = parse_dimension(ENV_HEIGHT, lookup(ENV_HEIGHT)) {
            config.height = height;
        }
        config
    }
}

fn parse_dimension(key: &str, value: Option<String>) -> Option<u32> {
    let value = value?;
    match value.trim().parse::<u32>() {
        Ok(0) => {
            log::warn!("Ignoring {key}=0");
            None
        }
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("Ignoring {key}={value}: {e}");
            None
        }
    }
}
