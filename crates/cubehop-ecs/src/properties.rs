//! Capability flags attached to every entity

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// One capability an entity may carry.
///
/// Data-bearing flags gate a component store; the rest mark gameplay behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Property {
    Transform,
    Velocity,
    Acceleration,
    Model,
    Shading,
    BoundingBox,
    Ai,
    Input,
    Checkpoint,
    Teleport,
    Bounce,
    DeathZone,
    Goal,
}

impl Property {
    pub const ALL: [Property; 13] = [
        Property::Transform,
        Property::Velocity,
        Property::Acceleration,
        Property::Model,
        Property::Shading,
        Property::BoundingBox,
        Property::Ai,
        Property::Input,
        Property::Checkpoint,
        Property::Teleport,
        Property::Bounce,
        Property::DeathZone,
        Property::Goal,
    ];

    const fn bit(self) -> u32 {
        1 << self as u8
    }
}

/// Fixed-size set of `Property` flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Properties(u32);

impl Properties {
    pub const EMPTY: Properties = Properties(0);

    /// Builder-style union, usable in constants.
    pub const fn with(self, property: Property) -> Self {
        Self(self.0 | property.bit())
    }

    pub fn contains(&self, property: Property) -> bool {
        self.0 & property.bit() != 0
    }

    /// Whether every flag in `other` is also set here.
    pub fn contains_all(&self, other: Properties) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, property: Property) {
        self.0 |= property.bit();
    }

    pub fn remove(&mut self, property: Property) {
        self.0 &= !property.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the set flags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Property> + '_ {
        Property::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl From<Property> for Properties {
    fn from(property: Property) -> Self {
        Properties::EMPTY.with(property)
    }
}

impl BitOr for Property {
    type Output = Properties;

    fn bitor(self, rhs: Property) -> Properties {
        Properties::from(self).with(rhs)
    }
}

impl BitOr<Property> for Properties {
    type Output = Properties;

    fn bitor(self, rhs: Property) -> Properties {
        self.with(rhs)
    }
}

impl BitOr for Properties {
    type Output = Properties;

    fn bitor(self, rhs: Properties) -> Properties {
        Properties(self.0 | rhs.0)
    }
}

impl BitOrAssign<Property> for Properties {
    fn bitor_assign(&mut self, rhs: Property) {
        self.insert(rhs);
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_membership() {
        let mask = Property::Transform | Property::Velocity;
        assert!(mask.contains(Property::Transform));
        assert!(mask.contains(Property::Velocity));
        assert!(!mask.contains(Property::Bounce));
    }

    #[test]
    fn superset_check() {
        let mask = Property::Transform | Property::BoundingBox | Property::Checkpoint;
        assert!(mask.contains_all(Property::Transform | Property::BoundingBox));
        assert!(!mask.contains_all(Property::Transform | Property::Teleport));
        assert!(mask.contains_all(Properties::EMPTY));
    }

    #[test]
    fn insert_remove() {
        let mut mask = Properties::EMPTY;
        mask |= Property::Goal;
        assert!(!mask.is_empty());
        mask.remove(Property::Goal);
        assert!(mask.is_empty());
    }

    #[test]
    fn debug_lists_flag_names() {
        let mask = Property::Teleport | Property::Transform;
        assert_eq!(format!("{mask:?}"), "{Transform, Teleport}");
    }
}
