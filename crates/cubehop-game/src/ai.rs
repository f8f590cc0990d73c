//! Waypoint patrol for AI-driven entities

use cubehop_core::Transform;
use cubehop_ecs::{AiBehavior, Property, Velocity, World};
use glam::Vec3;
use tracing::trace;

/// Steer every `Ai|Transform|Velocity` entity toward its current waypoint.
///
/// Velocity is set so that the body covers at most the remaining distance
/// this tick. Reaching a waypoint advances to the next one, wrapping around.
pub fn patrol(world: &mut World, dt: f32) {
    let patrollers: Vec<_> = world
        .entities_with(Property::Ai | Property::Transform | Property::Velocity)
        .collect();

    for entity in patrollers {
        let position = world.get::<Transform>(entity).position();
        let behavior = world.get_mut::<AiBehavior>(entity);
        if behavior.waypoints.is_empty() {
            continue;
        }

        behavior.current %= behavior.waypoints.len();
        if position.distance(behavior.waypoints[behavior.current]) <= behavior.arrive_radius {
            behavior.current = (behavior.current + 1) % behavior.waypoints.len();
            trace!(%entity, waypoint = behavior.current, "patrol waypoint reached");
        }

        let to_target = behavior.waypoints[behavior.current] - position;
        let distance = to_target.length();
        let linear = if distance == 0.0 {
            Vec3::ZERO
        } else if dt > 0.0 {
            to_target / distance * behavior.speed.min(distance / dt)
        } else {
            to_target / distance * behavior.speed
        };

        world.get_mut::<Velocity>(entity).linear = linear;
    }
}
