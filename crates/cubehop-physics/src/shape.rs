//! Conversions between `Obb` and rapier shapes

use cubehop_core::Obb;
use glam::{Mat3, Quat, Vec3};
use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::parry::query;
use rapier3d::parry::shape::Cuboid;
use rapier3d::prelude::*;

/// Pose of the box: its center plus the rotation taking the world axes to its axes.
pub(crate) fn isometry(obb: &Obb) -> Isometry<Real> {
    let rotation = Quat::from_mat3(&Mat3::from_cols(obb.axes[0], obb.axes[1], obb.axes[2]));
    Isometry::from_parts(
        Translation3::new(obb.center.x, obb.center.y, obb.center.z),
        UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    )
}

pub(crate) fn cuboid(obb: &Obb) -> Cuboid {
    Cuboid::new(vector![obb.half_extents.x, obb.half_extents.y, obb.half_extents.z])
}

pub(crate) fn to_glam(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Whether two boxes overlap. Touching faces count as overlapping.
pub fn boxes_overlap(a: &Obb, b: &Obb) -> bool {
    query::intersection_test(&isometry(a), &cuboid(a), &isometry(b), &cuboid(b)).unwrap_or(false)
}
