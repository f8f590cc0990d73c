use std::mem;

use cubehop_core::Obb;
use cubehop_ecs::{Entity, World};

use crate::{world_space_boxes, CollisionEvent, PhysicsSystem};

/// Replays queued collision events instead of detecting them.
///
/// Nothing moves; bounding boxes are recomputed from the world each step so
/// probes still see current transforms. Used by tests and replay tooling.
#[derive(Debug, Default)]
pub struct ScriptedPhysics {
    queued: Vec<CollisionEvent>,
    current: Vec<CollisionEvent>,
    boxes: Vec<Option<Obb>>,
}

impl ScriptedPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next step
    pub fn push(&mut self, event: CollisionEvent) {
        self.queued.push(event);
    }
}

impl PhysicsSystem for ScriptedPhysics {
    fn step(&mut self, world: &mut World, _dt: f32) {
        self.current = mem::take(&mut self.queued);
        world_space_boxes(world, &mut self.boxes);
    }

    fn collisions(&self) -> &[CollisionEvent] {
        &self.current
    }

    fn world_obb(&self, entity: Entity) -> Option<Obb> {
        self.boxes.get(entity.index() as usize).copied().flatten()
    }
}
