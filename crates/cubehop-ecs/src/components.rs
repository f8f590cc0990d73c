//! Component data kinds owned by the `World`
//!
//! `Transform` and `Obb` come from `cubehop-core`; the rest live here.

use cubehop_core::Color;
use glam::Vec3;

/// Linear velocity with a speed cap. A `max_speed` of zero means uncapped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub linear: Vec3,
    pub max_speed: f32,
}

impl Velocity {
    pub fn new(linear: Vec3, max_speed: f32) -> Self {
        Self { linear, max_speed }
    }

    /// Clamp `linear` to `max_speed` when a cap is set
    pub fn clamp_to_max(&mut self) {
        if self.max_speed > 0.0 {
            self.linear = self.linear.clamp_length_max(self.max_speed);
        }
    }
}

/// Constant acceleration applied every physics step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Acceleration(pub Vec3);

/// Handle into the renderer's model table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModelHandle(pub u32);

/// Surface shading parameters handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    pub color: Color,
    pub specular: f32,
    pub emissive: f32,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            specular: 0.0,
            emissive: 0.0,
        }
    }
}

/// Waypoint patrol state for AI-driven entities
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AiBehavior {
    /// Points visited in order, looping back to the first
    pub waypoints: Vec<Vec3>,
    /// Index of the waypoint currently being approached
    pub current: usize,
    /// Travel speed in units per second
    pub speed: f32,
    /// Distance at which a waypoint counts as reached
    pub arrive_radius: f32,
}

impl AiBehavior {
    pub fn patrol(waypoints: Vec<Vec3>, speed: f32) -> Self {
        Self {
            waypoints,
            current: 0,
            speed,
            arrive_radius: 0.1,
        }
    }
}

/// Movement intent written by the input layer each frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputIntent {
    /// Desired horizontal direction, length at most 1
    pub movement: Vec3,
    /// Jump requested this frame
    pub jump: bool,
}
