//! cubehop ECS - Entity Component store
//!
//! A fixed-capacity, flag-indexed component store. Every entity carries a
//! `Properties` bitmask that declares which component slots hold valid data
//! and which gameplay behaviors apply to it.

mod builder;
mod component;
mod components;
mod entity;
mod error;
mod properties;
mod world;

pub use builder::EntityBuilder;
pub use component::{Component, ComponentStore};
pub use components::{Acceleration, AiBehavior, InputIntent, ModelHandle, Shading, Velocity};
pub use entity::Entity;
pub use error::EcsError;
pub use properties::{Properties, Property};
pub use world::World;
