//! Collision provider backed by rapier3d
//!
//! The `World` stays the source of truth. Each step mirrors every
//! `Transform|BoundingBox` entity into a rapier body with a cuboid collider,
//! runs the pipeline, writes moved bodies back and turns the narrow phase's
//! contact and intersection pairs into `CollisionEvent`s.

use cubehop_core::{Obb, Transform};
use cubehop_ecs::{Acceleration, Entity, Properties, Property, Velocity, World};
use glam::Vec3;
use rapier3d::parry::query;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::shape::{isometry, to_glam};
use crate::{world_space_boxes, CollisionEvent, PhysicsSystem};

/// Flags that turn an entity's collider into a sensor: contacts are
/// reported but nothing is pushed out of it.
const SENSOR_PROPERTIES: Properties = Properties::EMPTY
    .with(Property::Checkpoint)
    .with(Property::Teleport)
    .with(Property::Goal)
    .with(Property::DeathZone);

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// How an entity takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    /// Velocity carrier: gravity, contacts and push-out apply
    Dynamic,
    /// AI-steered: follows its velocity, ignores gravity
    Kinematic,
    /// No velocity: never moves
    Fixed,
}

impl BodyKind {
    fn of(world: &World, entity: Entity) -> Self {
        if !world.has(entity, Property::Velocity) {
            BodyKind::Fixed
        } else if world.has(entity, Property::Ai) {
            BodyKind::Kinematic
        } else {
            BodyKind::Dynamic
        }
    }

    fn builder(self) -> RigidBodyBuilder {
        match self {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic().lock_rotations().can_sleep(false),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
        }
    }
}

/// An entity mirrored into rapier
#[derive(Debug, Clone, Copy)]
struct Body {
    rigid_body: RigidBodyHandle,
    kind: BodyKind,
    sensor: bool,
    half_extents: Vec3,
    /// Box center handed to rapier at the start of the step
    center: Vec3,
    /// Velocity the body carried into the step, gravity included
    velocity: Vec3,
}

/// rapier3d physics over the entities' oriented bounding boxes.
pub struct RapierPhysics {
    /// Configuration
    pub config: PhysicsConfig,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,

    /// Mirrored bodies indexed by entity slot
    bodies: Vec<Option<Body>>,
    /// World-space boxes indexed by entity slot
    boxes: Vec<Option<Obb>>,
    /// Contacts found by the last step
    collisions: Vec<CollisionEvent>,
}

impl RapierPhysics {
    /// Create a physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            bodies: Vec::new(),
            boxes: Vec::new(),
            collisions: Vec::new(),
        }
    }

    /// Recompute world-space boxes without advancing the simulation
    pub fn refresh(&mut self, world: &World) {
        world_space_boxes(world, &mut self.boxes);
    }

    /// Number of entities currently mirrored as rapier bodies
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    fn is_sensor(mask: Properties) -> bool {
        SENSOR_PROPERTIES.iter().any(|p| mask.contains(p))
    }

    fn insert_body(&mut self, entity: Entity, kind: BodyKind, sensor: bool, obb: &Obb) -> Body {
        let rigid_body = kind.builder().position(isometry(obb)).build();
        let collider = ColliderBuilder::cuboid(obb.half_extents.x, obb.half_extents.y, obb.half_extents.z)
            .sensor(sensor)
            .friction(0.0)
            .restitution(0.0)
            .user_data(u128::from(entity.index()))
            .build();

        let handle = self.rigid_body_set.insert(rigid_body);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        trace!(?entity, ?kind, sensor, "rapier body created");

        Body {
            rigid_body: handle,
            kind,
            sensor,
            half_extents: obb.half_extents,
            center: obb.center,
            velocity: Vec3::ZERO,
        }
    }

    fn remove_body(&mut self, slot: usize) {
        if let Some(body) = self.bodies[slot].take() {
            self.rigid_body_set.remove(
                body.rigid_body,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
        }
    }

    /// Apply acceleration and the speed cap to the entity's velocity and
    /// return what rapier should start the step with.
    fn launch_velocity(world: &mut World, entity: Entity, kind: BodyKind, dt: f32) -> Vec3 {
        if kind == BodyKind::Fixed {
            return Vec3::ZERO;
        }
        let acceleration = if world.has(entity, Property::Acceleration) {
            world.get::<Acceleration>(entity).0
        } else {
            Vec3::ZERO
        };
        let velocity = world.get_mut::<Velocity>(entity);
        velocity.linear += acceleration * dt;
        velocity.clamp_to_max();
        velocity.linear
    }

    /// Bring rapier in line with the world: create, rebuild or drop bodies
    /// and copy poses and velocities in.
    fn sync(&mut self, world: &mut World, dt: f32) {
        world_space_boxes(world, &mut self.boxes);
        self.bodies.resize(self.boxes.len(), None);

        for slot in 0..self.bodies.len() {
            let Some(obb) = self.boxes[slot] else {
                self.remove_body(slot);
                continue;
            };
            let entity = Entity::from_raw(slot as u32);
            let kind = BodyKind::of(world, entity);
            let sensor = Self::is_sensor(world.mask(entity));

            let stale = self.bodies[slot].map_or(true, |body| {
                body.kind != kind || body.sensor != sensor || body.half_extents != obb.half_extents
            });
            if stale {
                self.remove_body(slot);
                let body = self.insert_body(entity, kind, sensor, &obb);
                self.bodies[slot] = Some(body);
            }

            let linvel = Self::launch_velocity(world, entity, kind, dt);
            let gravity = if kind == BodyKind::Dynamic {
                self.config.gravity * dt
            } else {
                Vec3::ZERO
            };

            let Some(body) = self.bodies[slot].as_mut() else {
                continue;
            };
            body.center = obb.center;
            body.velocity = linvel + gravity;
            if let Some(rigid_body) = self.rigid_body_set.get_mut(body.rigid_body) {
                rigid_body.set_position(isometry(&obb), true);
                rigid_body.set_linvel(vector![linvel.x, linvel.y, linvel.z], true);
            }
        }
    }

    /// Copy moved poses, and velocities of dynamic bodies, back into the world.
    fn write_back(&self, world: &mut World) {
        for (slot, body) in self.bodies.iter().enumerate() {
            let Some(body) = body else {
                continue;
            };
            if body.kind == BodyKind::Fixed {
                continue;
            }
            let Some(rigid_body) = self.rigid_body_set.get(body.rigid_body) else {
                continue;
            };

            let entity = Entity::from_raw(slot as u32);
            let moved = to_glam(rigid_body.translation()) - body.center;
            world.get_mut::<Transform>(entity).translate(moved);

            if body.kind == BodyKind::Dynamic {
                let velocity = world.get_mut::<Velocity>(entity);
                velocity.linear = to_glam(rigid_body.linvel());
                velocity.clamp_to_max();
            }
        }
    }

    fn entity_of(&self, collider: ColliderHandle) -> Option<Entity> {
        self.collider_set
            .get(collider)
            .map(|c| Entity::from_raw(c.user_data as u32))
    }

    fn kind_of(&self, entity: Entity) -> Option<BodyKind> {
        self.bodies
            .get(entity.index() as usize)
            .copied()
            .flatten()
            .map(|body| body.kind)
    }

    fn velocity_of(&self, entity: Entity) -> Vec3 {
        self.bodies
            .get(entity.index() as usize)
            .copied()
            .flatten()
            .map_or(Vec3::ZERO, |body| body.velocity)
    }

    /// Solid contacts from the narrow phase. The moving body is the collider;
    /// between two dynamic bodies the lower ID is.
    fn contact_events(&self, events: &mut Vec<CollisionEvent>) {
        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let (Some(first), Some(second)) =
                (self.entity_of(pair.collider1), self.entity_of(pair.collider2))
            else {
                continue;
            };
            let Some((manifold, _)) = pair.find_deepest_contact() else {
                continue;
            };
            // Points from the first collider toward the second.
            let normal = to_glam(&manifold.data.normal);

            let first_moves = self.kind_of(first) == Some(BodyKind::Dynamic);
            let second_moves = self.kind_of(second) == Some(BodyKind::Dynamic);
            let first_is_collider = match (first_moves, second_moves) {
                (true, false) => true,
                (false, true) => false,
                _ => first < second,
            };

            let event = if first_is_collider {
                CollisionEvent::new(first, second, -normal, self.velocity_of(first))
            } else {
                CollisionEvent::new(second, first, normal, self.velocity_of(second))
            };
            events.push(event);
        }
    }

    /// Sensor overlaps. The sensor is always `collided_with`.
    fn sensor_events(&self, events: &mut Vec<CollisionEvent>) {
        for (a, b, intersecting) in self.narrow_phase.intersection_pairs() {
            if !intersecting {
                continue;
            }
            let (Some(first), Some(second)) = (self.collider_set.get(a), self.collider_set.get(b))
            else {
                continue;
            };
            let (sensor, mover) = match (first.is_sensor(), second.is_sensor()) {
                (true, false) => (first, second),
                (false, true) => (second, first),
                _ => continue,
            };

            let axis = query::contact(sensor.position(), sensor.shape(), mover.position(), mover.shape(), 0.0)
                .ok()
                .flatten()
                .map(|contact| to_glam(&contact.normal1))
                .unwrap_or_else(|| {
                    (to_glam(mover.translation()) - to_glam(sensor.translation())).normalize_or_zero()
                });

            let sensor_entity = Entity::from_raw(sensor.user_data as u32);
            let mover_entity = Entity::from_raw(mover.user_data as u32);
            events.push(CollisionEvent::new(
                mover_entity,
                sensor_entity,
                axis,
                self.velocity_of(mover_entity),
            ));
        }
    }
}

impl Default for RapierPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSystem for RapierPhysics {
    fn step(&mut self, world: &mut World, dt: f32) {
        // A zero-length step has nothing to integrate or solve.
        if dt <= 0.0 {
            self.refresh(world);
            self.collisions.clear();
            return;
        }

        self.sync(world, dt);
        self.integration_parameters.dt = dt;

        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];
        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.write_back(world);
        world_space_boxes(world, &mut self.boxes);

        let mut events = Vec::new();
        self.contact_events(&mut events);
        self.sensor_events(&mut events);
        events.sort_by_key(|event| (event.collider, event.collided_with));
        self.collisions = events;

        trace!(contacts = self.collisions.len(), bodies = self.body_count(), "physics step");
    }

    fn collisions(&self) -> &[CollisionEvent] {
        &self.collisions
    }

    fn world_obb(&self, entity: Entity) -> Option<Obb> {
        self.boxes.get(entity.index() as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubehop_ecs::{AiBehavior, EntityBuilder};

    const DT: f32 = 1.0 / 60.0;

    fn floor(world: &mut World) -> Entity {
        EntityBuilder::new()
            .with_position(Vec3::ZERO)
            .with_bounding_box(Obb::new(Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0)))
            .commit(world)
            .unwrap()
    }

    fn cube(world: &mut World, position: Vec3, velocity: Vec3) -> Entity {
        EntityBuilder::new()
            .with_position(position)
            .with_velocity(velocity, 0.0)
            .with_bounding_box(Obb::unit())
            .commit(world)
            .unwrap()
    }

    fn weightless() -> RapierPhysics {
        RapierPhysics::with_config(PhysicsConfig { gravity: Vec3::ZERO })
    }

    fn position(world: &World, entity: Entity) -> Vec3 {
        world.get::<Transform>(entity).position()
    }

    #[test]
    fn test_physics_world_creation() {
        let physics = RapierPhysics::new();
        assert_eq!(physics.config.gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn falling_cube_reports_floor_contact() {
        let mut world = World::new(8);
        let ground = floor(&mut world);
        let player = cube(&mut world, Vec3::new(0.0, 0.99, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let mut physics = RapierPhysics::new();
        physics.step(&mut world, DT);

        let events = physics.collisions();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].collider, player);
        assert_eq!(events[0].collided_with, ground);
        assert!(events[0].axis.y > 0.99, "axis points up, got {:?}", events[0].axis);
        assert!(events[0].collider_velocity.y < -1.0);
        assert!(position(&world, player).y > 0.97);
    }

    #[test]
    fn cube_comes_to_rest_on_floor() {
        let mut world = World::new(8);
        let ground = floor(&mut world);
        let player = cube(&mut world, Vec3::new(0.0, 1.3, 0.0), Vec3::ZERO);

        let mut physics = RapierPhysics::new();
        for _ in 0..120 {
            physics.step(&mut world, DT);
        }

        let y = position(&world, player).y;
        assert!((y - 1.0).abs() < 0.02, "cube rests on the floor, got y = {y}");
        assert!(physics
            .collisions()
            .iter()
            .any(|e| e.collider == player && e.collided_with == ground && e.axis.y > 0.99));
    }

    #[test]
    fn sensors_report_without_blocking() {
        let mut world = World::new(8);
        let player = cube(&mut world, Vec3::new(0.0, 0.9, 0.0), Vec3::ZERO);
        let checkpoint = EntityBuilder::new()
            .with_position(Vec3::ZERO)
            .with_bounding_box(Obb::unit())
            .checkpoint()
            .commit(&mut world)
            .unwrap();

        let mut physics = weightless();
        physics.step(&mut world, DT);

        let events = physics.collisions();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].collider, player);
        assert_eq!(events[0].collided_with, checkpoint);
        assert!(events[0].axis.y > 0.99);
        assert!((position(&world, player) - Vec3::new(0.0, 0.9, 0.0)).length() < 1e-4);
    }

    #[test]
    fn max_speed_caps_velocity() {
        let mut world = World::new(4);
        let fast = EntityBuilder::new()
            .with_position(Vec3::ZERO)
            .with_velocity(Vec3::new(100.0, 0.0, 0.0), 2.0)
            .with_bounding_box(Obb::unit())
            .commit(&mut world)
            .unwrap();

        let mut physics = weightless();
        physics.step(&mut world, 0.5);
        assert!((position(&world, fast).x - 1.0).abs() < 1e-3);
        assert!(world.get::<Velocity>(fast).linear.length() <= 2.0 + 1e-4);
    }

    #[test]
    fn ai_bodies_ignore_gravity() {
        let mut world = World::new(4);
        let guard = EntityBuilder::new()
            .with_position(Vec3::ZERO)
            .with_velocity(Vec3::X, 0.0)
            .with_bounding_box(Obb::unit())
            .with_ai(AiBehavior::patrol(vec![Vec3::X * 10.0], 1.0))
            .commit(&mut world)
            .unwrap();

        let mut physics = RapierPhysics::new();
        physics.step(&mut world, 0.5);
        let moved = position(&world, guard);
        assert!((moved - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn external_moves_are_picked_up() {
        let mut world = World::new(4);
        let player = cube(&mut world, Vec3::ZERO, Vec3::ZERO);
        let mut physics = weightless();
        physics.step(&mut world, DT);

        world.set(player, Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        physics.step(&mut world, DT);
        assert!((position(&world, player) - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(physics.world_obb(player).unwrap().center, position(&world, player));
    }

    #[test]
    fn destroyed_entities_leave_the_simulation() {
        let mut world = World::new(8);
        let ground = floor(&mut world);
        cube(&mut world, Vec3::new(0.0, 0.99, 0.0), Vec3::ZERO);

        let mut physics = RapierPhysics::new();
        physics.step(&mut world, DT);
        assert_eq!(physics.body_count(), 2);

        world.destroy(ground);
        physics.step(&mut world, DT);
        assert_eq!(physics.body_count(), 1);
        assert!(physics.collisions().iter().all(|e| !e.involves(ground)));
    }

    #[test]
    fn losing_the_box_flag_drops_the_body() {
        let mut world = World::new(4);
        let player = cube(&mut world, Vec3::ZERO, Vec3::ZERO);
        let mut physics = weightless();
        physics.step(&mut world, DT);
        assert_eq!(physics.body_count(), 1);

        world.remove_property(player, Property::BoundingBox);
        physics.step(&mut world, DT);
        assert_eq!(physics.body_count(), 0);
        assert!(physics.world_obb(player).is_none());
    }

    #[test]
    fn world_boxes_follow_transforms() {
        let mut world = World::new(4);
        let ground = floor(&mut world);
        let mut physics = RapierPhysics::new();
        physics.refresh(&world);
        assert_eq!(physics.world_obb(ground).unwrap().center, Vec3::ZERO);
        assert!(physics.world_obb(Entity::from_raw(3)).is_none());
    }
}
