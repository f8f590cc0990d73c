//! cubehop Game - Per-frame gameplay resolution
//!
//! Turns the physics provider's collision events into gameplay state:
//! ground/wall contact for the player cube, checkpoints, teleporters,
//! bounce pads, win and death handling.

pub mod ai;
pub mod config;
pub mod cube_state;
pub mod meta;
pub mod movement;
pub mod outcome;
pub mod rules;
pub mod session;

pub use config::{ConfigError, GameplayConfig, WallAngle};
pub use cube_state::{Contact, CubeClassifier, CubeState};
pub use meta::{GameStats, WorldMeta};
pub use ai::patrol;
pub use movement::{apply_input, MovementConfig};
pub use outcome::{OutcomeRules, StandardOutcome};
pub use rules::{respawn, FrameOutcome, RuleEngine};
pub use session::{FrameReport, Session};
