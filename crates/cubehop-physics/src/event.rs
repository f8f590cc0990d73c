use cubehop_ecs::Entity;
use glam::Vec3;

/// One contact between two entities detected this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The body whose motion produced the contact
    pub collider: Entity,
    /// The body it ran into
    pub collided_with: Entity,
    /// Unit contact normal pointing from `collided_with` toward `collider`
    pub axis: Vec3,
    /// Velocity of `collider` at the moment of contact
    pub collider_velocity: Vec3,
}

impl CollisionEvent {
    pub fn new(collider: Entity, collided_with: Entity, axis: Vec3, collider_velocity: Vec3) -> Self {
        Self {
            collider,
            collided_with,
            axis,
            collider_velocity,
        }
    }

    /// Whether `entity` is either side of the contact
    pub fn involves(&self, entity: Entity) -> bool {
        self.collider == entity || self.collided_with == entity
    }

    /// The participant that is not `entity`, if `entity` takes part at all
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.collider == entity {
            Some(self.collided_with)
        } else if self.collided_with == entity {
            Some(self.collider)
        } else {
            None
        }
    }

    /// The contact normal as seen from `entity`: pointing from the other body toward it.
    pub fn normal_toward(&self, entity: Entity) -> Vec3 {
        if self.collided_with == entity {
            -self.axis
        } else {
            self.axis
        }
    }
}
