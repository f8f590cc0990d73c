//! Fluent entity factory
//!
//! A builder is a plain value: cloning it (or calling `copy`) yields an
//! independent template that can be tweaked and committed many times.

use cubehop_core::{Obb, Transform};
use glam::{Mat4, Vec3};

use crate::component::Component;
use crate::components::{Acceleration, AiBehavior, InputIntent, ModelHandle, Shading, Velocity};
use crate::entity::Entity;
use crate::error::EcsError;
use crate::properties::{Properties, Property};
use crate::world::World;

/// Accumulates a mask and pending component values for one entity.
#[derive(Debug, Clone, Default)]
pub struct EntityBuilder {
    properties: Properties,
    transform: Transform,
    velocity: Velocity,
    acceleration: Acceleration,
    model: ModelHandle,
    shading: Shading,
    bounding_box: Obb,
    ai: AiBehavior,
    input: InputIntent,
}

impl EntityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent duplicate of this builder's pending state.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Flags accumulated so far
    pub fn properties(&self) -> Properties {
        self.properties
    }

    /// The transform that `commit` would write
    pub fn pending_transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the whole pending pose.
    pub fn with_transform(mut self, matrix: Mat4) -> Self {
        self.properties.insert(Property::Transform);
        self.transform = Transform(matrix);
        self
    }

    /// Replace only the translation of the pending pose.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.properties.insert(Property::Transform);
        self.transform.set_position(position);
        self
    }

    pub fn with_velocity(mut self, linear: Vec3, max_speed: f32) -> Self {
        self.properties.insert(Property::Velocity);
        self.velocity = Velocity::new(linear, max_speed);
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.properties.insert(Property::Acceleration);
        self.acceleration = Acceleration(acceleration);
        self
    }

    pub fn with_model(mut self, model: ModelHandle) -> Self {
        self.properties.insert(Property::Model);
        self.model = model;
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.properties.insert(Property::Shading);
        self.shading = shading;
        self
    }

    /// Model-space bounding box
    pub fn with_bounding_box(mut self, bounding_box: Obb) -> Self {
        self.properties.insert(Property::BoundingBox);
        self.bounding_box = bounding_box;
        self
    }

    pub fn with_ai(mut self, ai: AiBehavior) -> Self {
        self.properties.insert(Property::Ai);
        self.ai = ai;
        self
    }

    pub fn with_input(mut self) -> Self {
        self.properties.insert(Property::Input);
        self.input = InputIntent::default();
        self
    }

    /// Add a behavior flag that carries no data.
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.insert(property);
        self
    }

    pub fn checkpoint(self) -> Self {
        self.with_property(Property::Checkpoint)
    }

    pub fn teleporter(self) -> Self {
        self.with_property(Property::Teleport)
    }

    pub fn bounce_pad(self) -> Self {
        self.with_property(Property::Bounce)
    }

    pub fn death_zone(self) -> Self {
        self.with_property(Property::DeathZone)
    }

    pub fn goal(self) -> Self {
        self.with_property(Property::Goal)
    }

    /// Allocate an entity with the accumulated mask and write every flagged
    /// component. The builder is left untouched for reuse.
    pub fn commit(&self, world: &mut World) -> Result<Entity, EcsError> {
        let entity = world.create_entity(self.properties)?;
        self.write(world, entity, &self.transform);
        self.write(world, entity, &self.velocity);
        self.write(world, entity, &self.acceleration);
        self.write(world, entity, &self.model);
        self.write(world, entity, &self.shading);
        self.write(world, entity, &self.bounding_box);
        self.write(world, entity, &self.ai);
        self.write(world, entity, &self.input);
        Ok(entity)
    }

    fn write<C: Component>(&self, world: &mut World, entity: Entity, value: &C) {
        if self.properties.contains(C::PROPERTY) {
            world.set(entity, value.clone());
        }
    }
}
