//! Fly camera: view/projection matrices and a keyboard + mouse controller.
//!
//! Controls: W/A/S/D (or arrow keys) move, Q/E move down/up, holding the
//! right mouse button and dragging looks around, the scroll wheel moves
//! along the view direction.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseScrollDelta},
    keyboard::KeyCode,
};

use crate::{
    bridge::set_camera_position,
    shader::{self, ShaderUniforms},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Write `view`, `projection` and `viewPosition` for the current camera.
pub fn apply_camera<S: ShaderUniforms + ?Sized>(shader: &mut S, camera: &Camera, projection: &Projection) {
    shader.set_mat4(shader::VIEW, camera.calc_matrix());
    shader.set_mat4(shader::PROJECTION, projection.calc_matrix());
    set_camera_position(shader, Vector3::new(camera.position.x, camera.position.y, camera.position.z));
}

#[derive(Debug, Default)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    scroll: f32,
    speed: f32,
    sensitivity: f32,
    is_looking: bool,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            ..Default::default()
        }
    }

    /// Returns true when the key is one the controller reacts to.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.amount_forward = amount,
            KeyCode::KeyS | KeyCode::ArrowDown => self.amount_backward = amount,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.amount_left = amount,
            KeyCode::KeyD | KeyCode::ArrowRight => self.amount_right = amount,
            KeyCode::KeyE | KeyCode::Space => self.amount_up = amount,
            KeyCode::KeyQ | KeyCode::ShiftLeft => self.amount_down = amount,
            _ => return false,
        }
        true
    }

    pub fn set_looking(&mut self, looking: bool) {
        self.is_looking = looking;
    }

    pub fn process_mouse(&mut self, mouse_dx: f64, mouse_dy: f64) {
        if !self.is_looking {
            return;
        }
        self.rotate_horizontal += mouse_dx as f32;
        self.rotate_vertical += mouse_dy as f32;
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        self.scroll = match delta {
            MouseScrollDelta::LineDelta(_, scroll) => *scroll,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 100.0,
        };
    }

    pub fn update_camera(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        let (yaw_sin, yaw_cos) = camera.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        camera.position += forward * (self.amount_forward - self.amount_backward) * self.speed * dt;
        camera.position += right * (self.amount_right - self.amount_left) * self.speed * dt;
        camera.position += camera.forward() * self.scroll * self.speed * 0.5;
        camera.position.y += (self.amount_up - self.amount_down) * self.speed * dt;
        self.scroll = 0.0;

        let sensitivity = self.sensitivity * dt;
        camera.yaw += Rad(self.rotate_horizontal) * sensitivity;
        camera.pitch += Rad(-self.rotate_vertical) * sensitivity;
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;

        camera.pitch = Rad(camera.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
    }
}
