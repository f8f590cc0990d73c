//! Ground/wall classification for the player cube
//!
//! Each frame starts airborne and is rebuilt from the contact normals that
//! touch the player. A single-frame retention probe keeps the previous
//! contact alive when it was lost only by a hair, e.g. at a ledge edge.

use cubehop_core::{Obb, Transform};
use cubehop_ecs::{Entity, Property, World};
use cubehop_physics::{boxes_overlap, CollisionEvent, PhysicsSystem};
use glam::Vec3;
use tracing::debug;

use crate::config::{ConfigError, GameplayConfig, WallAngle};

/// Coarse contact state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Airborne,
    Grounded,
    OnWall,
}

/// Classification output for one frame.
///
/// `on_ground` and `on_wall` are never both set; ground wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubeState {
    pub on_ground: bool,
    pub on_wall: bool,
    /// Normal of the ground contact, pointing toward the player
    pub ground_axis: Vec3,
    /// Normal of the wall contact, pointing toward the player
    pub wall_axis: Vec3,
}

impl CubeState {
    pub const AIRBORNE: CubeState = CubeState {
        on_ground: false,
        on_wall: false,
        ground_axis: Vec3::ZERO,
        wall_axis: Vec3::ZERO,
    };

    pub fn grounded(axis: Vec3) -> Self {
        Self {
            on_ground: true,
            ground_axis: axis,
            ..Self::AIRBORNE
        }
    }

    pub fn against_wall(axis: Vec3) -> Self {
        Self {
            on_wall: true,
            wall_axis: axis,
            ..Self::AIRBORNE
        }
    }

    pub fn contact(&self) -> Contact {
        if self.on_ground {
            Contact::Grounded
        } else if self.on_wall {
            Contact::OnWall
        } else {
            Contact::Airborne
        }
    }
}

/// Classifies the player's contacts with one frame of hysteresis.
///
/// The classifier itself is stateless; the caller owns the previous frame's
/// `CubeState` and hands it back in.
#[derive(Debug, Clone)]
pub struct CubeClassifier {
    wall_angle: WallAngle,
    retention_epsilon: f32,
}

impl CubeClassifier {
    pub fn new(config: &GameplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            wall_angle: WallAngle::from_degrees(config.wall_angle_degrees)?,
            retention_epsilon: config.retention_epsilon,
        })
    }

    /// Classify this frame's contacts alone, without retention.
    ///
    /// With several qualifying contacts the last one in event order wins.
    pub fn raw_classify(&self, player: Entity, events: &[CollisionEvent]) -> CubeState {
        let mut state = CubeState::AIRBORNE;

        for event in events.iter().filter(|e| e.involves(player)) {
            let axis = event.normal_toward(player);
            let vertical = axis.y;
            let horizontal = (axis.x * axis.x + axis.z * axis.z).sqrt();

            if vertical > self.wall_angle.ground_threshold() {
                state.on_ground = true;
                state.ground_axis = axis;
            } else if horizontal > self.wall_angle.wall_threshold() {
                state.on_wall = true;
                state.wall_axis = axis;
            }
        }

        if state.on_ground {
            state.on_wall = false;
            state.wall_axis = Vec3::ZERO;
        }
        state
    }

    /// Full classification: raw contacts, then the retention probe against
    /// `previous`. Only one retention branch can fire per frame.
    pub fn classify<P: PhysicsSystem + ?Sized>(
        &self,
        previous: &CubeState,
        player: Entity,
        events: &[CollisionEvent],
        world: &World,
        physics: &P,
    ) -> CubeState {
        let state = self.raw_classify(player, events);

        if previous.on_ground && !state.on_ground {
            let offset = -previous.ground_axis * self.retention_epsilon;
            if let Some(hit) = self.probe(player, offset, world, physics) {
                debug!(%hit, "ground contact retained");
                return CubeState::grounded(previous.ground_axis);
            }
        } else if previous.on_wall && !state.on_ground && !state.on_wall {
            let offset = -previous.wall_axis * self.retention_epsilon;
            if let Some(hit) = self.probe(player, offset, world, physics) {
                debug!(%hit, "wall contact retained");
                return CubeState::against_wall(previous.wall_axis);
            }
        }
        state
    }

    /// First entity, other than the player, whose world box overlaps the
    /// player's box shifted by `offset`.
    pub fn probe<P: PhysicsSystem + ?Sized>(
        &self,
        player: Entity,
        offset: Vec3,
        world: &World,
        physics: &P,
    ) -> Option<Entity> {
        let Some(player_box) = physics.world_obb(player) else {
            debug!(%player, "no bounding box for player, skipping probe");
            return None;
        };
        let shifted = player_box.translated(offset);

        world
            .entities_with(Property::Transform | Property::BoundingBox)
            .filter(|&other| other != player)
            .find(|&other| {
                let other_box = physics.world_obb(other).unwrap_or_else(|| {
                    let matrix = world.get::<Transform>(other).matrix();
                    world.get::<Obb>(other).transformed(&matrix)
                });
                boxes_overlap(&shifted, &other_box)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubehop_ecs::EntityBuilder;
    use cubehop_physics::ScriptedPhysics;

    struct Fixture {
        world: World,
        physics: ScriptedPhysics,
        player: Entity,
        ground: Entity,
        classifier: CubeClassifier,
    }

    /// Player cube hovering `gap` above the top face of a wide slab.
    /// The slab is 1.0 thick, so its top sits at `0.5 - gap`.
    fn fixture(gap: f32) -> Fixture {
        let mut world = World::new(16);
        let player = EntityBuilder::new()
            .with_position(Vec3::new(0.0, 1.0, 0.0))
            .with_velocity(Vec3::ZERO, 0.0)
            .with_bounding_box(Obb::unit())
            .with_input()
            .commit(&mut world)
            .unwrap();
        let ground = EntityBuilder::new()
            .with_position(Vec3::new(0.0, -gap, 0.0))
            .with_bounding_box(Obb::new(Vec3::ZERO, Vec3::new(5.0, 0.5, 5.0)))
            .commit(&mut world)
            .unwrap();

        let mut physics = ScriptedPhysics::new();
        physics.step(&mut world, 0.0);

        Fixture {
            world,
            physics,
            player,
            ground,
            classifier: CubeClassifier::new(&GameplayConfig::default()).unwrap(),
        }
    }

    fn hit(player: Entity, other: Entity, axis: Vec3) -> CollisionEvent {
        CollisionEvent::new(player, other, axis, Vec3::ZERO)
    }

    #[test]
    fn upward_normal_is_ground() {
        let f = fixture(0.0);
        let state = f.classifier.raw_classify(f.player, &[hit(f.player, f.ground, Vec3::Y)]);
        assert!(state.on_ground);
        assert!(!state.on_wall);
        assert_eq!(state.ground_axis, Vec3::Y);
    }

    #[test]
    fn horizontal_normal_is_wall() {
        let f = fixture(0.0);
        let state = f.classifier.raw_classify(f.player, &[hit(f.player, f.ground, Vec3::X)]);
        assert!(state.on_wall);
        assert!(!state.on_ground);
        assert_eq!(state.contact(), Contact::OnWall);
    }

    #[test]
    fn downward_normal_is_neither() {
        let f = fixture(0.0);
        let state = f.classifier.raw_classify(f.player, &[hit(f.player, f.ground, -Vec3::Y)]);
        assert_eq!(state, CubeState::AIRBORNE);
    }

    #[test]
    fn passive_side_sees_flipped_normal() {
        let f = fixture(0.0);
        let event = CollisionEvent::new(f.ground, f.player, -Vec3::Y, Vec3::ZERO);
        let state = f.classifier.raw_classify(f.player, &[event]);
        assert!(state.on_ground);
        assert_eq!(state.ground_axis, Vec3::Y);
    }

    #[test]
    fn events_without_player_are_ignored() {
        let f = fixture(0.0);
        let event = CollisionEvent::new(f.ground, Entity::from_raw(9), Vec3::Y, Vec3::ZERO);
        assert_eq!(f.classifier.raw_classify(f.player, &[event]), CubeState::AIRBORNE);
    }

    #[test]
    fn ground_beats_wall_in_either_order() {
        let f = fixture(0.0);
        let ground = hit(f.player, f.ground, Vec3::Y);
        let wall = hit(f.player, f.ground, Vec3::Z);

        for events in [[ground, wall], [wall, ground]] {
            let state = f.classifier.raw_classify(f.player, &events);
            assert!(state.on_ground);
            assert!(!state.on_wall);
            assert_eq!(state.wall_axis, Vec3::ZERO);
        }
    }

    #[test]
    fn last_qualifying_contact_wins() {
        let f = fixture(0.0);
        let tilted = Vec3::new(0.3, 1.0, 0.0).normalize();
        let events = [hit(f.player, f.ground, Vec3::Y), hit(f.player, f.ground, tilted)];
        let state = f.classifier.raw_classify(f.player, &events);
        assert_eq!(state.ground_axis, tilted);
    }

    #[test]
    fn slope_angle_splits_ground_and_wall() {
        let f = fixture(0.0);
        // 80 degrees from vertical: y = cos(80) < cos(75), horizontal = sin(80) > sin(75) -> wall.
        let steep = Vec3::new(80f32.to_radians().sin(), 80f32.to_radians().cos(), 0.0);
        assert!(f.classifier.raw_classify(f.player, &[hit(f.player, f.ground, steep)]).on_wall);

        // 70 degrees: y = cos(70) > cos(75) -> ground.
        let slope = Vec3::new(70f32.to_radians().sin(), 70f32.to_radians().cos(), 0.0);
        assert!(f.classifier.raw_classify(f.player, &[hit(f.player, f.ground, slope)]).on_ground);
    }

    #[test]
    fn ground_retained_with_previous_axis() {
        // Bottom of the player is 0.02 above the slab; the probe reaches 0.035.
        let f = fixture(0.02);
        let previous_axis = Vec3::new(0.0, 1.0, 0.0);
        let previous = CubeState::grounded(previous_axis);

        let state = f
            .classifier
            .classify(&previous, f.player, &[], &f.world, &f.physics);
        assert!(state.on_ground);
        assert_eq!(state.ground_axis, previous_axis);
    }

    #[test]
    fn ground_retention_overrides_fresh_wall() {
        let f = fixture(0.02);
        let previous = CubeState::grounded(Vec3::Y);
        let wall = hit(f.player, f.ground, Vec3::X);

        let state = f
            .classifier
            .classify(&previous, f.player, &[wall], &f.world, &f.physics);
        assert_eq!(state, CubeState::grounded(Vec3::Y));
    }

    #[test]
    fn ground_lost_when_probe_misses() {
        let f = fixture(0.06);
        let previous = CubeState::grounded(Vec3::Y);
        let state = f
            .classifier
            .classify(&previous, f.player, &[], &f.world, &f.physics);
        assert_eq!(state, CubeState::AIRBORNE);
    }

    #[test]
    fn airborne_history_never_probes() {
        let f = fixture(0.02);
        let state = f
            .classifier
            .classify(&CubeState::AIRBORNE, f.player, &[], &f.world, &f.physics);
        assert_eq!(state, CubeState::AIRBORNE);
    }

    #[test]
    fn wall_retained_with_previous_axis() {
        let mut f = fixture(5.0);
        // Wall face sits 0.02 to the player's -X side.
        let wall = EntityBuilder::new()
            .with_position(Vec3::new(-1.02, 1.0, 0.0))
            .with_bounding_box(Obb::unit())
            .commit(&mut f.world)
            .unwrap();
        f.physics.step(&mut f.world, 0.0);

        let previous = CubeState::against_wall(Vec3::X);
        let state = f
            .classifier
            .classify(&previous, f.player, &[], &f.world, &f.physics);
        assert_eq!(state, CubeState::against_wall(Vec3::X));
        assert_eq!(
            f.classifier
                .probe(f.player, -Vec3::X * 0.035, &f.world, &f.physics),
            Some(wall)
        );
    }

    #[test]
    fn wall_history_does_not_fire_when_now_grounded() {
        let f = fixture(0.0);
        let previous = CubeState::against_wall(Vec3::X);
        let state = f.classifier.classify(
            &previous,
            f.player,
            &[hit(f.player, f.ground, Vec3::Y)],
            &f.world,
            &f.physics,
        );
        assert_eq!(state, CubeState::grounded(Vec3::Y));
    }

    #[test]
    fn probe_ignores_the_player_itself() {
        let f = fixture(3.0);
        assert_eq!(
            f.classifier.probe(f.player, Vec3::ZERO, &f.world, &f.physics),
            None
        );
    }
}
