//! Demo course used by the headless harness
//!
//! A floor strip with a checkpoint, two linked teleporters, a bounce pad,
//! a lava pit, a patrolling block and the goal at the far end.

use anyhow::Result;
use cubehop_core::{Color, Obb};
use cubehop_ecs::{AiBehavior, Entity, EntityBuilder, ModelHandle, Shading, World};
use glam::Vec3;
use tracing::debug;

const CUBE_MODEL: ModelHandle = ModelHandle(0);

pub struct DemoLevel {
    pub world: World,
    pub player: Entity,
}

fn shaded(color: Color) -> Shading {
    Shading {
        color,
        ..Shading::default()
    }
}

/// Lay out the course in a fresh world of the given capacity.
pub fn build(capacity: usize) -> Result<DemoLevel> {
    let mut world = World::new(capacity);

    let slab = EntityBuilder::new()
        .with_model(CUBE_MODEL)
        .with_shading(shaded(Color::from_hex(0x7f8c8d)))
        .with_bounding_box(Obb::new(Vec3::ZERO, Vec3::new(4.0, 0.5, 4.0)));
    for x in [0.0, 8.0, 16.0, 40.0, 48.0] {
        slab.copy()
            .with_position(Vec3::new(x, 0.0, 0.0))
            .commit(&mut world)?;
    }

    let trigger = EntityBuilder::new()
        .with_model(CUBE_MODEL)
        .with_bounding_box(Obb::unit());

    trigger
        .copy()
        .with_shading(shaded(Color::BLUE))
        .with_position(Vec3::new(8.0, 1.0, 0.0))
        .checkpoint()
        .commit(&mut world)?;

    let portal = trigger.copy().with_shading(shaded(Color::from_hex(0x9b59b6))).teleporter();
    portal
        .copy()
        .with_position(Vec3::new(18.0, 1.0, 0.0))
        .commit(&mut world)?;
    portal
        .copy()
        .with_position(Vec3::new(40.0, 6.5, 0.0))
        .commit(&mut world)?;

    slab.copy()
        .with_shading(shaded(Color::GREEN))
        .with_position(Vec3::new(24.0, -2.0, 0.0))
        .with_bounding_box(Obb::new(Vec3::ZERO, Vec3::new(1.0, 0.25, 1.0)))
        .bounce_pad()
        .commit(&mut world)?;

    slab.copy()
        .with_shading(shaded(Color::RED))
        .with_position(Vec3::new(30.0, -4.0, 0.0))
        .with_bounding_box(Obb::new(Vec3::ZERO, Vec3::new(8.0, 0.5, 8.0)))
        .death_zone()
        .commit(&mut world)?;

    EntityBuilder::new()
        .with_model(CUBE_MODEL)
        .with_shading(shaded(Color::from_hex(0xe67e22)))
        .with_position(Vec3::new(44.0, 1.0, -2.0))
        .with_velocity(Vec3::ZERO, 0.0)
        .with_bounding_box(Obb::unit())
        .with_ai(AiBehavior::patrol(
            vec![Vec3::new(44.0, 1.0, -2.0), Vec3::new(44.0, 1.0, 2.0)],
            1.5,
        ))
        .commit(&mut world)?;

    trigger
        .copy()
        .with_shading(Shading {
            color: Color::from_hex(0xf1c40f),
            emissive: 1.0,
            ..Shading::default()
        })
        .with_position(Vec3::new(50.0, 1.0, 0.0))
        .goal()
        .commit(&mut world)?;

    let player = EntityBuilder::new()
        .with_model(CUBE_MODEL)
        .with_shading(shaded(Color::WHITE))
        .with_position(Vec3::new(0.0, 1.5, 0.0))
        .with_velocity(Vec3::ZERO, 20.0)
        .with_bounding_box(Obb::unit())
        .with_input()
        .commit(&mut world)?;

    debug!(entities = world.len(), "demo level built");
    Ok(DemoLevel { world, player })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubehop_core::Transform;
    use cubehop_ecs::Property;

    #[test]
    fn course_has_every_feature() {
        let level = build(64).unwrap();
        let world = &level.world;

        assert_eq!(world.entities_with(Property::Teleport).count(), 2);
        assert_eq!(world.entities_with(Property::Checkpoint).count(), 1);
        assert_eq!(world.entities_with(Property::Goal).count(), 1);
        assert_eq!(world.entities_with(Property::Ai).count(), 1);
        assert!(world.has(level.player, Property::Input));
        assert_eq!(
            world.get::<Transform>(level.player).position(),
            Vec3::new(0.0, 1.5, 0.0)
        );
    }

    #[test]
    fn too_small_a_world_is_an_error() {
        assert!(build(4).is_err());
    }
}
