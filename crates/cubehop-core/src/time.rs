//! Frame timing for the simulation loop
//!
//! The simulation advances in fixed steps; wall-clock deltas are accumulated
//! and drained one step at a time.

use serde::{Deserialize, Serialize};

/// Configuration for the frame clock
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Fixed simulation timestep (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta accepted per update to prevent spiral of death
    pub max_delta_time: f32,
    /// Upper bound on steps drained by a single update
    pub max_steps_per_update: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
            max_steps_per_update: 8,
        }
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Configuration
    pub config: TimeConfig,
    /// Total simulated time in seconds
    pub simulated_time: f64,
    /// Number of fixed steps taken so far
    pub step_count: u64,
    accumulator: f32,
}

impl FrameClock {
    /// Create a new clock with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Feed a raw frame delta and return how many fixed steps are due
    pub fn advance(&mut self, raw_delta: f32) -> u32 {
        self.accumulator += raw_delta.clamp(0.0, self.config.max_delta_time);

        let mut steps = 0;
        while self.accumulator >= self.config.fixed_timestep
            && steps < self.config.max_steps_per_update
        {
            self.accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        self.step_count += steps as u64;
        self.simulated_time += (steps as f64) * self.config.fixed_timestep as f64;
        steps
    }

    /// The fixed timestep in seconds
    pub fn timestep(&self) -> f32 {
        self.config.fixed_timestep
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn interpolation(&self) -> f32 {
        self.accumulator / self.config.fixed_timestep
    }
}
