//! Win and death predicates
//!
//! What counts as winning or dying is level policy, so the rule engine asks
//! an `OutcomeRules` implementation instead of hard-coding it.

use cubehop_core::Transform;
use cubehop_ecs::{Entity, Property, World};
use cubehop_physics::CollisionEvent;

/// Level policy consulted after the per-event rules have run.
pub trait OutcomeRules {
    /// Whether this contact wins the level.
    fn is_win(&self, world: &World, player: Entity, event: &CollisionEvent) -> bool;

    /// Whether this contact kills the player.
    fn is_death(&self, world: &World, player: Entity, event: &CollisionEvent) -> bool;

    /// Death that needs no contact, such as falling out of the level.
    fn is_out_of_bounds(&self, _world: &World, _player: Entity) -> bool {
        false
    }
}

/// Goal flag wins, death-zone flag or falling below `kill_height` kills.
#[derive(Debug, Clone)]
pub struct StandardOutcome {
    pub kill_height: f32,
}

impl StandardOutcome {
    pub fn new(kill_height: f32) -> Self {
        Self { kill_height }
    }

    fn player_touches(world: &World, player: Entity, event: &CollisionEvent, flag: Property) -> bool {
        event
            .other(player)
            .is_some_and(|other| world.has(other, flag))
    }
}

impl OutcomeRules for StandardOutcome {
    fn is_win(&self, world: &World, player: Entity, event: &CollisionEvent) -> bool {
        Self::player_touches(world, player, event, Property::Goal)
    }

    fn is_death(&self, world: &World, player: Entity, event: &CollisionEvent) -> bool {
        Self::player_touches(world, player, event, Property::DeathZone)
    }

    fn is_out_of_bounds(&self, world: &World, player: Entity) -> bool {
        // Without a pose there is no height to fall below.
        world.has(player, Property::Transform)
            && world.get::<Transform>(player).position().y < self.kill_height
    }
}
