use std::fmt;

use crate::error::EcsError;

/// An opaque entity handle. IDs are handed out in increasing order and never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// Create an entity from a raw index (mainly for testing).
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// The slot index of this entity.
    pub fn index(&self) -> u32 {
        self.0
    }

    pub(crate) fn slot(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic entity allocator bounded by a fixed capacity.
pub(crate) struct EntityAllocator {
    next: u32,
    capacity: usize,
}

impl EntityAllocator {
    pub fn new(capacity: usize) -> Self {
        Self { next: 0, capacity }
    }

    /// Allocate the next unused ID.
    pub fn allocate(&mut self) -> Result<Entity, EcsError> {
        if self.next as usize >= self.capacity {
            return Err(EcsError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        let entity = Entity(self.next);
        self.next += 1;
        Ok(entity)
    }

    /// Number of IDs handed out so far.
    pub fn allocated(&self) -> usize {
        self.next as usize
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
