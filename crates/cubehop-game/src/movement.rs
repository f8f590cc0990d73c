//! Player movement from input intent

use cubehop_ecs::{Entity, InputIntent, Property, Velocity, World};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cube_state::CubeState;

/// Movement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal top speed in units per second
    pub move_speed: f32,
    /// Ground acceleration (how fast you reach top speed)
    pub ground_acceleration: f32,
    /// Air acceleration (reduced control in air)
    pub air_acceleration: f32,
    /// Jump initial velocity
    pub jump_velocity: f32,
    /// Horizontal push away from the wall on a wall jump
    pub wall_jump_push: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            ground_acceleration: 50.0,
            air_acceleration: 12.0,
            jump_velocity: 8.0,
            wall_jump_push: 6.0,
        }
    }
}

impl MovementConfig {
    /// Get the current acceleration based on grounded state
    pub fn acceleration(&self, grounded: bool) -> f32 {
        if grounded {
            self.ground_acceleration
        } else {
            self.air_acceleration
        }
    }
}

/// Turn the player's `InputIntent` into velocity.
///
/// Horizontal velocity eases toward `movement * move_speed`. A jump request
/// is honoured from the ground, or from a wall with a push along the wall
/// normal, and is consumed either way.
pub fn apply_input(
    world: &mut World,
    player: Entity,
    cube: &CubeState,
    config: &MovementConfig,
    dt: f32,
) {
    if !world.has(player, Property::Input) || !world.has(player, Property::Velocity) {
        return;
    }

    let intent = std::mem::take(world.get_mut::<InputIntent>(player));
    let velocity = world.get_mut::<Velocity>(player);

    let horizontal = Vec3::new(velocity.linear.x, 0.0, velocity.linear.z);
    let target = Vec3::new(intent.movement.x, 0.0, intent.movement.z).clamp_length_max(1.0)
        * config.move_speed;
    let step = config.acceleration(cube.on_ground) * dt;
    let horizontal = move_towards(horizontal, target, step);
    velocity.linear.x = horizontal.x;
    velocity.linear.z = horizontal.z;

    if !intent.jump {
        return;
    }
    if cube.on_ground {
        velocity.linear.y = config.jump_velocity;
        debug!(%player, "jump");
    } else if cube.on_wall {
        let push = Vec3::new(cube.wall_axis.x, 0.0, cube.wall_axis.z) * config.wall_jump_push;
        velocity.linear.x += push.x;
        velocity.linear.z += push.z;
        velocity.linear.y = config.jump_velocity;
        debug!(%player, "wall jump");
    }
}

/// Move a vector towards a target by a maximum delta
fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let diff = target - current;
    let distance = diff.length();

    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + diff / distance * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubehop_ecs::EntityBuilder;

    fn player(world: &mut World) -> Entity {
        EntityBuilder::new()
            .with_position(Vec3::ZERO)
            .with_velocity(Vec3::ZERO, 0.0)
            .with_input()
            .commit(world)
            .unwrap()
    }

    fn request(world: &mut World, player: Entity, movement: Vec3, jump: bool) {
        world.set(player, InputIntent { movement, jump });
    }

    #[test]
    fn ground_jump_consumes_request() {
        let mut world = World::new(4);
        let player = player(&mut world);
        let config = MovementConfig::default();
        let grounded = CubeState::grounded(Vec3::Y);

        request(&mut world, player, Vec3::ZERO, true);
        apply_input(&mut world, player, &grounded, &config, 1.0 / 60.0);
        assert_eq!(world.get::<Velocity>(player).linear.y, config.jump_velocity);
        assert!(!world.get::<InputIntent>(player).jump);
    }

    #[test]
    fn airborne_jump_does_nothing() {
        let mut world = World::new(4);
        let player = player(&mut world);

        request(&mut world, player, Vec3::ZERO, true);
        apply_input(&mut world, player, &CubeState::AIRBORNE, &MovementConfig::default(), 0.1);
        assert_eq!(world.get::<Velocity>(player).linear, Vec3::ZERO);
        assert!(!world.get::<InputIntent>(player).jump);
    }

    #[test]
    fn wall_jump_pushes_off_the_wall() {
        let mut world = World::new(4);
        let player = player(&mut world);
        let config = MovementConfig::default();

        request(&mut world, player, Vec3::ZERO, true);
        apply_input(&mut world, player, &CubeState::against_wall(Vec3::X), &config, 0.0);
        let velocity = world.get::<Velocity>(player).linear;
        assert_eq!(velocity.y, config.jump_velocity);
        assert_eq!(velocity.x, config.wall_jump_push);
    }

    #[test]
    fn horizontal_speed_ramps_to_target() {
        let mut world = World::new(4);
        let player = player(&mut world);
        let config = MovementConfig::default();
        let grounded = CubeState::grounded(Vec3::Y);

        request(&mut world, player, Vec3::X, false);
        apply_input(&mut world, player, &grounded, &config, 0.01);
        let first = world.get::<Velocity>(player).linear.x;
        assert!((first - 0.5).abs() < 1e-5);

        for _ in 0..100 {
            request(&mut world, player, Vec3::X, false);
            apply_input(&mut world, player, &grounded, &config, 0.01);
        }
        assert!((world.get::<Velocity>(player).linear.x - config.move_speed).abs() < 1e-5);
    }

    #[test]
    fn move_towards_stops_at_target() {
        assert_eq!(move_towards(Vec3::ZERO, Vec3::X, 5.0), Vec3::X);
        assert_eq!(move_towards(Vec3::ZERO, Vec3::X * 10.0, 2.0), Vec3::X * 2.0);
    }
}
