use cubehop_core::{Obb, Transform};

use crate::component::{Component, ComponentStore};
use crate::components::{Acceleration, AiBehavior, InputIntent, ModelHandle, Shading, Velocity};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::properties::{Properties, Property};

/// The central component store. Owns every entity mask and component slot.
///
/// All stores are sized to the entity capacity at creation; nothing grows
/// afterwards. Component access trusts the caller to have checked the mask,
/// and debug builds assert it.
pub struct World {
    entities: EntityAllocator,
    masks: Box<[Properties]>,
    alive: Box<[bool]>,

    transforms: ComponentStore<Transform>,
    velocities: ComponentStore<Velocity>,
    accelerations: ComponentStore<Acceleration>,
    models: ComponentStore<ModelHandle>,
    shadings: ComponentStore<Shading>,
    bounding_boxes: ComponentStore<Obb>,
    behaviors: ComponentStore<AiBehavior>,
    inputs: ComponentStore<InputIntent>,
}

macro_rules! impl_component {
    ($ty:ty, $property:ident, $field:ident) => {
        impl Component for $ty {
            const PROPERTY: Property = Property::$property;

            fn store(world: &World) -> &ComponentStore<Self> {
                &world.$field
            }

            fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
                &mut world.$field
            }
        }
    };
}

impl_component!(Transform, Transform, transforms);
impl_component!(Velocity, Velocity, velocities);
impl_component!(Acceleration, Acceleration, accelerations);
impl_component!(ModelHandle, Model, models);
impl_component!(Shading, Shading, shadings);
impl_component!(Obb, BoundingBox, bounding_boxes);
impl_component!(AiBehavior, Ai, behaviors);
impl_component!(InputIntent, Input, inputs);

impl World {
    /// Create a world able to hold `capacity` entities.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds u32::MAX.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than zero");
        assert!(
            capacity <= u32::MAX as usize,
            "capacity cannot exceed u32::MAX"
        );

        Self {
            entities: EntityAllocator::new(capacity),
            masks: vec![Properties::EMPTY; capacity].into_boxed_slice(),
            alive: vec![false; capacity].into_boxed_slice(),
            transforms: ComponentStore::new(capacity),
            velocities: ComponentStore::new(capacity),
            accelerations: ComponentStore::new(capacity),
            models: ComponentStore::new(capacity),
            shadings: ComponentStore::new(capacity),
            bounding_boxes: ComponentStore::new(capacity),
            behaviors: ComponentStore::new(capacity),
            inputs: ComponentStore::new(capacity),
        }
    }

    // ---- Entity management ----

    /// Allocate the next entity and record its mask.
    pub fn create_entity(&mut self, mask: Properties) -> Result<Entity, EcsError> {
        let entity = self.entities.allocate()?;
        self.masks[entity.slot()] = mask;
        self.alive[entity.slot()] = true;
        Ok(entity)
    }

    /// Clear an entity's mask. Returns `true` if it was alive.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.masks[entity.slot()] = Properties::EMPTY;
        self.alive[entity.slot()] = false;
        true
    }

    /// Check whether an entity is alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        entity.slot() < self.entities.allocated() && self.alive[entity.slot()]
    }

    /// Fail fast when handed an ID that does not name a live entity.
    #[track_caller]
    pub fn assert_live(&self, entity: Entity) {
        assert!(self.is_alive(entity), "entity {entity} is not alive");
    }

    /// Number of entities created so far, including destroyed ones.
    pub fn len(&self) -> usize {
        self.entities.allocated()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    // ---- Masks ----

    #[track_caller]
    pub fn mask(&self, entity: Entity) -> Properties {
        self.assert_allocated(entity);
        self.masks[entity.slot()]
    }

    pub fn has(&self, entity: Entity, property: Property) -> bool {
        self.mask(entity).contains(property)
    }

    /// Add flags to a live entity.
    ///
    /// Slots newly covered by the mask hold whatever was last written, which
    /// is the default value unless the entity set it before.
    pub fn insert_properties(&mut self, entity: Entity, properties: impl Into<Properties>) {
        self.assert_live(entity);
        let slot = &mut self.masks[entity.slot()];
        *slot = *slot | properties.into();
    }

    pub fn remove_property(&mut self, entity: Entity, property: Property) {
        self.assert_live(entity);
        self.masks[entity.slot()].remove(property);
    }

    /// Live entities whose mask is a superset of `mask`, in ascending ID order.
    pub fn entities_with(&self, mask: impl Into<Properties>) -> impl Iterator<Item = Entity> + '_ {
        let mask = mask.into();
        (0..self.entities.allocated())
            .filter(move |&slot| self.alive[slot] && self.masks[slot].contains_all(mask))
            .map(|slot| Entity(slot as u32))
    }

    // ---- Component access ----

    /// Read a component. The entity's mask must carry `C::PROPERTY`.
    #[track_caller]
    pub fn get<C: Component>(&self, entity: Entity) -> &C {
        self.check_access::<C>(entity);
        C::store(self).get(entity.slot())
    }

    /// Mutable access to a component. The entity's mask must carry `C::PROPERTY`.
    #[track_caller]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        self.check_access::<C>(entity);
        C::store_mut(self).get_mut(entity.slot())
    }

    /// Overwrite a component. The entity's mask must carry `C::PROPERTY`.
    #[track_caller]
    pub fn set<C: Component>(&mut self, entity: Entity, value: C) {
        self.check_access::<C>(entity);
        C::store_mut(self).set(entity.slot(), value);
    }

    /// Set the component's flag and write its value in one go.
    pub fn insert<C: Component>(&mut self, entity: Entity, value: C) {
        self.insert_properties(entity, C::PROPERTY);
        C::store_mut(self).set(entity.slot(), value);
    }

    #[track_caller]
    fn assert_allocated(&self, entity: Entity) {
        assert!(
            entity.slot() < self.entities.allocated(),
            "entity {entity} was never allocated"
        );
    }

    #[track_caller]
    fn check_access<C: Component>(&self, entity: Entity) {
        self.assert_allocated(entity);
        debug_assert!(
            self.masks[entity.slot()].contains(C::PROPERTY),
            "entity {entity} has no {:?} component",
            C::PROPERTY
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn create_records_mask() {
        let mut world = World::new(8);
        let e = world.create_entity(Property::Transform | Property::Checkpoint).unwrap();
        assert!(world.is_alive(e));
        assert!(world.has(e, Property::Checkpoint));
        assert!(!world.has(e, Property::Velocity));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut world = World::new(4);
        let a = world.create_entity(Properties::EMPTY).unwrap();
        assert!(world.destroy(a));
        let b = world.create_entity(Properties::EMPTY).unwrap();
        assert!(b > a);
        assert!(!world.is_alive(a));
    }

    #[test]
    fn remove_property_clears_flag() {
        let mut world = World::new(4);
        let e = world.create_entity(Property::Transform | Property::Goal).unwrap();
        world.remove_property(e, Property::Goal);
        assert!(!world.has(e, Property::Goal));
        assert!(world.has(e, Property::Transform));
        assert_eq!(world.entities_with(Property::Goal).count(), 0);
        assert_eq!(world.entities_with(Property::Transform).collect::<Vec<_>>(), vec![e]);
    }

    #[test]
    fn capacity_exhaustion_is_an_error() {
        let mut world = World::new(2);
        world.create_entity(Properties::EMPTY).unwrap();
        world.create_entity(Properties::EMPTY).unwrap();
        assert_eq!(
            world.create_entity(Properties::EMPTY),
            Err(EcsError::CapacityExhausted { capacity: 2 })
        );
    }

    #[test]
    fn component_read_write() {
        let mut world = World::new(4);
        let e = world.create_entity(Property::Velocity.into()).unwrap();
        world.set(e, Velocity::new(Vec3::X, 3.0));
        world.get_mut::<Velocity>(e).linear.y = 2.0;
        assert_eq!(world.get::<Velocity>(e).linear, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn entities_with_is_ascending_superset_match() {
        let mut world = World::new(8);
        let solid = Property::Transform | Property::BoundingBox;
        let a = world.create_entity(solid).unwrap();
        let _b = world.create_entity(Property::Transform.into()).unwrap();
        let c = world.create_entity(solid | Property::Bounce).unwrap();
        let d = world.create_entity(solid).unwrap();
        world.destroy(d);

        let found: Vec<_> = world.entities_with(solid).collect();
        assert_eq!(found, vec![a, c]);
        // Recomputed on every call.
        assert_eq!(world.entities_with(solid).count(), 2);
        assert_eq!(world.entities_with(Property::Bounce).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn insert_sets_flag() {
        let mut world = World::new(2);
        let e = world.create_entity(Properties::EMPTY).unwrap();
        world.insert(e, Transform::from_position(Vec3::ONE));
        assert!(world.has(e, Property::Transform));
        assert_eq!(world.get::<Transform>(e).position(), Vec3::ONE);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "has no Velocity component")]
    fn unflagged_read_panics_in_debug() {
        let mut world = World::new(2);
        let e = world.create_entity(Property::Transform.into()).unwrap();
        world.get::<Velocity>(e);
    }

    #[test]
    #[should_panic(expected = "never allocated")]
    fn unallocated_access_panics() {
        let world = World::new(2);
        world.get::<Transform>(Entity::from_raw(1));
    }

    #[test]
    #[should_panic(expected = "is not alive")]
    fn assert_live_rejects_destroyed() {
        let mut world = World::new(2);
        let e = world.create_entity(Properties::EMPTY).unwrap();
        world.destroy(e);
        world.assert_live(e);
    }
}
