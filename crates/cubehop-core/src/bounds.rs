//! Oriented bounding boxes
//!
//! Plain box data. Overlap queries live with the physics provider, which
//! turns these into collider shapes.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Scaled axes shorter than this keep their previous direction.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// An oriented bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    /// Box center
    pub center: Vec3,
    /// Half size along each local axis
    pub half_extents: Vec3,
    /// Orthonormal local axes
    pub axes: [Vec3; 3],
}

impl Default for Obb {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::splat(0.5))
    }
}

impl Obb {
    /// Axis-aligned box around `center`
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            axes: [Vec3::X, Vec3::Y, Vec3::Z],
        }
    }

    /// Unit cube centered on the origin, the usual model-space volume
    pub fn unit() -> Self {
        Self::default()
    }

    /// Map a model-space box through `matrix` into world space.
    ///
    /// Scale is folded into the half extents so the axes stay unit length.
    pub fn transformed(&self, matrix: &Mat4) -> Obb {
        let mut axes = self.axes;
        let mut half_extents = self.half_extents;
        for i in 0..3 {
            let scaled = matrix.transform_vector3(self.axes[i] * self.half_extents[i]);
            let length = scaled.length();
            half_extents[i] = length;
            if length > DEGENERATE_EPSILON {
                axes[i] = scaled / length;
            }
        }
        Obb {
            center: matrix.transform_point3(self.center),
            half_extents,
            axes,
        }
    }

    /// The same box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Obb {
        Obb {
            center: self.center + offset,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn rotation_turns_the_axes() {
        let matrix = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let rotated = Obb::unit().transformed(&matrix);
        assert!((rotated.center - Vec3::X).length() < 1e-5);
        assert!((rotated.axes[0] + Vec3::Z).length() < 1e-5);
        assert!((rotated.half_extents - Vec3::splat(0.5)).length() < 1e-5);
    }

    #[test]
    fn translated_keeps_shape() {
        let moved = Obb::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)).translated(Vec3::Y);
        assert_eq!(moved.center, Vec3::Y);
        assert_eq!(moved.half_extents, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn transform_folds_scale_into_extents() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(4.0, 1.0, 2.0),
            Quat::IDENTITY,
            Vec3::new(0.0, 3.0, 0.0),
        );
        let world = Obb::unit().transformed(&matrix);
        assert_eq!(world.center, Vec3::new(0.0, 3.0, 0.0));
        assert!((world.half_extents - Vec3::new(2.0, 0.5, 1.0)).length() < 1e-5);
        assert!((world.axes[0] - Vec3::X).length() < 1e-5);
    }
}
