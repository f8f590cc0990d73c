//! cubehop Physics - Collision provider contract
//!
//! The gameplay layer only consumes two things from physics: the frame's
//! collision events and the current world-space bounding box of each entity.
//! `PhysicsSystem` is that contract. `RapierPhysics` implements it on
//! rapier3d and `ScriptedPhysics` replays hand-written events.

mod event;
mod rapier_physics;
mod scripted;
mod shape;

pub use event::CollisionEvent;
pub use rapier_physics::{PhysicsConfig, RapierPhysics};
pub use scripted::ScriptedPhysics;
pub use shape::boxes_overlap;

use cubehop_core::{Obb, Transform};
use cubehop_ecs::{Entity, Property, World};

/// A per-frame producer of collision events and world-space bounding volumes.
pub trait PhysicsSystem {
    /// Advance one simulation tick and regenerate the collision list.
    fn step(&mut self, world: &mut World, dt: f32);

    /// Collisions detected by the last `step`, in the order the provider reports them.
    fn collisions(&self) -> &[CollisionEvent];

    /// World-space bounding box of `entity` as of the last `step`.
    fn world_obb(&self, entity: Entity) -> Option<Obb>;
}

/// Model-space box times current transform for every entity carrying both,
/// indexed by entity slot.
pub(crate) fn world_space_boxes(world: &World, boxes: &mut Vec<Option<Obb>>) {
    boxes.clear();
    boxes.resize(world.len(), None);
    for entity in world.entities_with(Property::Transform | Property::BoundingBox) {
        let matrix = world.get::<Transform>(entity).matrix();
        boxes[entity.index() as usize] = Some(world.get::<Obb>(entity).transformed(&matrix));
    }
}
