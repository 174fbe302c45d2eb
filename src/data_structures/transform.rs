//! Per-object transformation data.
//!
//! Every object in the scene is a shared primitive mesh placed with its own
//! scale, Euler rotation and position. The rotation is given in degrees and
//! applied in X, Y, Z matrix-multiplication order.

use cgmath::{Deg, Matrix4, Vector3};

/// Scale, rotation (degrees around X, Y and Z) and position of one drawn primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Transform {
    /// Create a new transform with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn from_parts(
        scale: impl Into<Vector3<f32>>,
        rotation: impl Into<Vector3<f32>>,
        position: impl Into<Vector3<f32>>,
    ) -> Self {
        Self {
            scale: scale.into(),
            rotation: rotation.into(),
            position: position.into(),
        }
    }

    /// The model matrix `translate * rotate_x * rotate_y * rotate_z * scale`.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

impl From<&Transform> for Matrix4<f32> {
    fn from(transform: &Transform) -> Self {
        transform.to_matrix()
    }
}
