//! cubehop Core - Core types and utilities for the cubehop simulation
//!
//! This crate provides the foundational types shared by every other crate:
//! - Mathematical primitives (re-exported from glam)
//! - `Transform` pose matrix component
//! - Oriented bounding boxes in model and world space
//! - Fixed-timestep frame clock

pub mod bounds;
pub mod time;
pub mod types;

pub use bounds::Obb;
pub use glam::{Mat4, Quat, Vec3};
pub use time::{FrameClock, TimeConfig};
pub use types::{Color, Transform};
