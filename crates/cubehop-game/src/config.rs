//! Gameplay tuning

use serde::{Deserialize, Serialize};

/// Errors in gameplay configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("wall angle must lie strictly between 0 and 90 degrees, got {0}")]
    WallAngleOutOfRange(f32),

    #[error("retention epsilon must be positive, got {0}")]
    NonPositiveEpsilon(f32),
}

/// Gameplay constants consumed by the classifier and rule engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Surfaces steeper than this (from horizontal) count as walls, in degrees
    pub wall_angle_degrees: f32,
    /// Distance the retention probe reaches past a lost contact
    pub retention_epsilon: f32,
    /// How far along the contact normal a teleported body lands from the destination
    pub teleport_offset: f32,
    /// Falling below this height kills the player
    pub kill_height: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            wall_angle_degrees: 75.0,
            retention_epsilon: 0.035,
            teleport_offset: 5.0,
            kill_height: -50.0,
        }
    }
}

impl GameplayConfig {
    /// Check every constraint the runtime relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        WallAngle::from_degrees(self.wall_angle_degrees)?;
        if !(self.retention_epsilon > 0.0) {
            return Err(ConfigError::NonPositiveEpsilon(self.retention_epsilon));
        }
        Ok(())
    }
}

/// The ground/wall split angle, only constructible inside (0°, 90°).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallAngle {
    cos: f32,
    sin: f32,
}

impl WallAngle {
    pub fn from_degrees(degrees: f32) -> Result<Self, ConfigError> {
        if !(degrees > 0.0 && degrees < 90.0) {
            return Err(ConfigError::WallAngleOutOfRange(degrees));
        }
        let radians = degrees.to_radians();
        Ok(Self {
            cos: radians.cos(),
            sin: radians.sin(),
        })
    }

    /// Minimum vertical normal component for a ground contact
    pub fn ground_threshold(&self) -> f32 {
        self.cos
    }

    /// Minimum horizontal normal magnitude for a wall contact
    pub fn wall_threshold(&self) -> f32 {
        self.sin
    }
}
