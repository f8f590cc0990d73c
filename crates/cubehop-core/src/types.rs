//! Core types used throughout cubehop

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Pose of an entity stored as a full affine matrix.
///
/// Rotation and scale live in the upper 3x3 block, translation in the last column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub Mat4);

impl Default for Transform {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

impl Transform {
    /// Create an unrotated, unscaled transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self(Mat4::from_translation(position))
    }

    /// Create a transform from scale, rotation and position
    pub fn from_scale_rotation_position(scale: Vec3, rotation: Quat, position: Vec3) -> Self {
        Self(Mat4::from_scale_rotation_translation(scale, rotation, position))
    }

    /// The model matrix
    pub fn matrix(&self) -> Mat4 {
        self.0
    }

    /// World-space position (translation column)
    pub fn position(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }

    /// Replace the translation, keeping rotation and scale
    pub fn set_position(&mut self, position: Vec3) {
        self.0.w_axis = position.extend(1.0);
    }

    /// Translate by the given offset
    pub fn translate(&mut self, offset: Vec3) {
        let position = self.position() + offset;
        self.set_position(position);
    }
}

/// RGBA color with floating point components (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Create a color from RGB values (alpha = 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from a hex value (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
