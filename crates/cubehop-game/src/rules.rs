//! Collision rule engine
//!
//! Runs once per frame after classification. Each event is checked against
//! the checkpoint, teleport and bounce rules in that order, then the frame
//! as a whole is checked for a win, and only without a win for a death.

use cubehop_core::Transform;
use cubehop_ecs::{Entity, Property, Velocity, World};
use cubehop_physics::CollisionEvent;
use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::GameplayConfig;
use crate::cube_state::CubeState;
use crate::meta::WorldMeta;
use crate::outcome::OutcomeRules;

/// What a frame amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Won,
    Died,
}

/// Borrowed view of everything the rules may mutate during one frame.
pub struct RuleEngine<'a, R: Rng + ?Sized> {
    pub world: &'a mut World,
    pub meta: &'a mut WorldMeta,
    /// This frame's classification; bounce pads reset it
    pub cube: &'a mut CubeState,
    pub player: Entity,
    pub config: &'a GameplayConfig,
    /// Source for teleport destination choice
    pub rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RuleEngine<'a, R> {
    /// Apply every rule for this frame's events.
    ///
    /// # Panics
    ///
    /// Panics if any event names an entity that is not alive.
    pub fn run(&mut self, events: &[CollisionEvent], outcome: &dyn OutcomeRules) -> FrameOutcome {
        for event in events {
            self.world.assert_live(event.collider);
            self.world.assert_live(event.collided_with);
        }

        for event in events {
            self.checkpoint(event);
            self.teleport(event);
            self.bounce(event);
        }

        if events
            .iter()
            .any(|event| outcome.is_win(self.world, self.player, event))
        {
            if !self.meta.won {
                info!(elapsed = self.meta.stats.elapsed, deaths = self.meta.stats.deaths, "level won");
            }
            self.meta.won = true;
            return FrameOutcome::Won;
        }

        let died = events
            .iter()
            .any(|event| outcome.is_death(self.world, self.player, event))
            || outcome.is_out_of_bounds(self.world, self.player);
        if died {
            respawn(self.world, self.meta, self.player);
            return FrameOutcome::Died;
        }

        FrameOutcome::Continue
    }

    /// The body the collider ran into, unless that body is the player.
    fn struck_surface(&self, event: &CollisionEvent) -> Option<Entity> {
        (event.collided_with != self.player).then_some(event.collided_with)
    }

    fn checkpoint(&mut self, event: &CollisionEvent) {
        let Some(other) = event.other(self.player) else {
            return;
        };
        if !self
            .world
            .mask(other)
            .contains_all(Property::Checkpoint | Property::Transform)
        {
            return;
        }

        let position = self.world.get::<Transform>(other).position();
        if position == self.meta.spawn_point {
            return;
        }
        self.meta.spawn_point = position;
        self.meta.checkpoints_passed += 1;
        info!(
            checkpoint = %other,
            passed = self.meta.checkpoints_passed,
            "checkpoint reached"
        );
    }

    fn teleport(&mut self, event: &CollisionEvent) {
        let Some(entrance) = self.struck_surface(event) else {
            return;
        };
        let traveller = event.collider;
        if !self.world.has(entrance, Property::Teleport)
            || !self.world.has(traveller, Property::Transform)
        {
            return;
        }

        let exits: Vec<Entity> = self
            .world
            .entities_with(Property::Teleport | Property::Transform)
            .filter(|&e| e != entrance)
            .collect();
        let Some(&exit) = exits.choose(&mut *self.rng) else {
            warn!(%entrance, "teleporter has no other exit, ignoring");
            return;
        };

        let destination =
            self.world.get::<Transform>(exit).position() - event.axis * self.config.teleport_offset;
        self.world
            .get_mut::<Transform>(traveller)
            .set_position(destination);
        if self.world.has(traveller, Property::Velocity) {
            self.world.get_mut::<Velocity>(traveller).linear = event.collider_velocity;
        }
        debug!(%traveller, %entrance, %exit, "teleported");
    }

    fn bounce(&mut self, event: &CollisionEvent) {
        let Some(pad) = self.struck_surface(event) else {
            return;
        };
        if !self.world.has(pad, Property::Bounce) {
            return;
        }

        let reflected = reflect(event.collider_velocity, event.axis);
        if self.world.has(event.collider, Property::Velocity) {
            self.world.get_mut::<Velocity>(event.collider).linear = reflected;
        }
        if event.involves(self.player) {
            *self.cube = CubeState::AIRBORNE;
        }
        debug!(collider = %event.collider, %pad, ?reflected, "bounced");
    }
}

/// Mirror `velocity` about the plane with unit normal `normal`.
pub fn reflect(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Put the player back at the spawn point and reset the run.
pub fn respawn(world: &mut World, meta: &mut WorldMeta, player: Entity) {
    if world.has(player, Property::Transform) {
        world
            .get_mut::<Transform>(player)
            .set_position(meta.spawn_point);
    }
    if world.has(player, Property::Velocity) {
        world.get_mut::<Velocity>(player).linear = Vec3::ZERO;
    }

    meta.won = false;
    meta.time_since_game_over = 0.0;
    meta.stats.deaths += 1;
    meta.stats.elapsed = 0.0;
    meta.raise_respawn_cue();
    info!(deaths = meta.stats.deaths, spawn = ?meta.spawn_point, "player respawned");
}
