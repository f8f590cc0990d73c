//! One running level
//!
//! A `Session` owns everything a level needs between frames: the world,
//! meta-state, the previous frame's cube state and the RNG. Sessions share
//! nothing, so any number can run side by side.

use cubehop_core::Transform;
use cubehop_ecs::{Entity, InputIntent, Property, World};
use cubehop_physics::PhysicsSystem;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::info;

use crate::ai;
use crate::config::{ConfigError, GameplayConfig};
use crate::cube_state::{CubeClassifier, CubeState};
use crate::meta::WorldMeta;
use crate::movement::{apply_input, MovementConfig};
use crate::outcome::{OutcomeRules, StandardOutcome};
use crate::rules::{self, FrameOutcome, RuleEngine};

/// Summary of one simulated frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub outcome: FrameOutcome,
    /// Cube state after classification and rules
    pub cube: CubeState,
    /// Collision events the physics provider reported
    pub contacts: usize,
}

pub struct Session<R: Rng = StdRng> {
    world: World,
    meta: WorldMeta,
    player: Entity,
    config: GameplayConfig,
    movement: MovementConfig,
    classifier: CubeClassifier,
    previous: CubeState,
    outcome: Box<dyn OutcomeRules>,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Start a level. The player's current position becomes the spawn point.
    ///
    /// # Panics
    ///
    /// Panics if `player` is not alive or has no transform.
    pub fn new(
        world: World,
        player: Entity,
        config: GameplayConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        world.assert_live(player);
        assert!(
            world.has(player, Property::Transform),
            "player {player} has no transform"
        );

        let classifier = CubeClassifier::new(&config)?;
        let spawn = world.get::<Transform>(player).position();
        info!(%player, ?spawn, entities = world.len(), "session started");

        Ok(Self {
            meta: WorldMeta::new(spawn),
            outcome: Box::new(StandardOutcome::new(config.kill_height)),
            movement: MovementConfig::default(),
            previous: CubeState::AIRBORNE,
            world,
            player,
            config,
            classifier,
            rng,
        })
    }

    /// Replace the win/death policy
    pub fn with_outcome(mut self, outcome: impl OutcomeRules + 'static) -> Self {
        self.outcome = Box::new(outcome);
        self
    }

    pub fn with_movement(mut self, movement: MovementConfig) -> Self {
        self.movement = movement;
        self
    }

    /// Queue the player's intent for the next step
    pub fn set_input(&mut self, intent: InputIntent) {
        self.world.insert(self.player, intent);
    }

    /// Simulate one frame.
    pub fn step<P: PhysicsSystem + ?Sized>(&mut self, physics: &mut P, dt: f32) -> FrameReport {
        apply_input(&mut self.world, self.player, &self.previous, &self.movement, dt);
        ai::patrol(&mut self.world, dt);
        physics.step(&mut self.world, dt);

        let events = physics.collisions();
        let mut cube = self
            .classifier
            .classify(&self.previous, self.player, events, &self.world, &*physics);

        self.meta.tick(dt);

        let outcome = RuleEngine {
            world: &mut self.world,
            meta: &mut self.meta,
            cube: &mut cube,
            player: self.player,
            config: &self.config,
            rng: &mut self.rng,
        }
        .run(events, self.outcome.as_ref());

        // A respawned player starts over in the air.
        if outcome == FrameOutcome::Died {
            cube = CubeState::AIRBORNE;
        }

        self.previous = cube;
        FrameReport {
            outcome,
            cube,
            contacts: events.len(),
        }
    }

    /// Send the player back to the spawn point and count a death.
    pub fn respawn(&mut self) {
        rules::respawn(&mut self.world, &mut self.meta, self.player);
        self.previous = CubeState::AIRBORNE;
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn meta(&self) -> &WorldMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut WorldMeta {
        &mut self.meta
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    /// Cube state produced by the last step
    pub fn cube(&self) -> CubeState {
        self.previous
    }

    pub fn config(&self) -> &GameplayConfig {
        &self.config
    }
}
