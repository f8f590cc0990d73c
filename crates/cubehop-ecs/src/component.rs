use crate::properties::Property;
use crate::world::World;

/// A component kind with its own store in the `World`.
///
/// Each kind is tied to exactly one `Property`; a slot is meaningful only
/// while the entity's mask carries that flag.
pub trait Component: Clone + Default + 'static {
    /// The flag that marks a slot of this kind as valid.
    const PROPERTY: Property;

    fn store(world: &World) -> &ComponentStore<Self>;
    fn store_mut(world: &mut World) -> &mut ComponentStore<Self>;
}

/// Pre-sized, ID-indexed storage for one component kind.
///
/// Every slot exists from creation; validity is tracked by the entity mask,
/// not by the store.
pub struct ComponentStore<T> {
    slots: Box<[T]>,
}

impl<T: Clone + Default> ComponentStore<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity].into_boxed_slice(),
        }
    }

    pub fn get(&self, index: usize) -> &T {
        assert!(
            index < self.slots.len(),
            "component slot {index} out of range (capacity {})",
            self.slots.len()
        );
        &self.slots[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut T {
        assert!(
            index < self.slots.len(),
            "component slot {index} out of range (capacity {})",
            self.slots.len()
        );
        &mut self.slots[index]
    }

    pub fn set(&mut self, index: usize, value: T) {
        *self.get_mut(index) = value;
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
