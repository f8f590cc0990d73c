//! Simulation settings with persistence
//!
//! Settings are read from `~/.config/cubehop/settings.toml` unless a path is
//! given on the command line. Every table is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use cubehop_core::TimeConfig;
use cubehop_game::{GameplayConfig, MovementConfig};
use cubehop_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All simulation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub gameplay: GameplayConfig,
    pub movement: MovementConfig,
    pub physics: PhysicsConfig,
    pub time: TimeConfig,
    pub run: RunSettings,
}

impl SimSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cubehop"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the config directory, or return defaults if absent
    /// or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{e:#}, using defaults");
                Self::default()
            }
        }
    }

    /// Load settings from an explicit file. Errors are not papered over.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = Self::parse(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.gameplay.validate()?;
        Ok(settings)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Parameters of the headless run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Entity capacity of the world
    pub capacity: usize,
    /// Seed for the session RNG
    pub seed: u64,
    /// Number of fixed steps to simulate
    pub steps: u32,
    /// Wall-clock delta fed to the frame clock per rendered frame
    pub frame_delta: f32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            capacity: 64,
            seed: 0x5eed,
            steps: 1800,
            frame_delta: 1.0 / 60.0,
        }
    }
}
