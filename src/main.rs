//! cubehop - headless platformer simulation
//!
//! Builds the demo course, drives the player along it with a scripted input
//! track and logs checkpoints, teleports, deaths and the win.

mod level;
mod settings;

use std::path::Path;

use anyhow::{Context, Result};
use cubehop_core::FrameClock;
use cubehop_ecs::InputIntent;
use cubehop_game::{FrameOutcome, Session};
use cubehop_physics::RapierPhysics;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::SimSettings;

/// Steps between scripted jump presses
const JUMP_INTERVAL: u64 = 45;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let settings = match std::env::args().nth(1).as_deref() {
        Some("--write-defaults") => {
            SimSettings::default().save()?;
            return Ok(());
        }
        Some(path) => SimSettings::load_from(Path::new(path))?,
        None => SimSettings::load(),
    };

    info!("Starting cubehop simulation...");

    let demo = level::build(settings.run.capacity).context("Failed to build demo level")?;
    let rng = StdRng::seed_from_u64(settings.run.seed);
    let mut session = Session::new(demo.world, demo.player, settings.gameplay.clone(), rng)
        .context("Invalid gameplay settings")?
        .with_movement(settings.movement.clone());
    let mut physics = RapierPhysics::with_config(settings.physics.clone());
    let mut clock = FrameClock::new(settings.time.clone());

    anyhow::ensure!(
        settings.run.frame_delta > 0.0,
        "run.frame_delta must be positive, got {}",
        settings.run.frame_delta
    );

    let mut wins = 0u32;
    while clock.step_count < u64::from(settings.run.steps) {
        let steps = clock.advance(settings.run.frame_delta);
        for _ in 0..steps {
            session.set_input(InputIntent {
                movement: Vec3::X,
                jump: clock.step_count % JUMP_INTERVAL == 0,
            });
            let report = session.step(&mut physics, clock.timestep());

            match report.outcome {
                FrameOutcome::Won => wins += 1,
                FrameOutcome::Died => debug!(step = clock.step_count, "player died"),
                FrameOutcome::Continue => {}
            }
            if session.meta_mut().take_respawn_cue() {
                debug!("play respawn cue");
            }
        }
    }

    let meta = session.meta();
    info!(
        simulated = clock.simulated_time,
        deaths = meta.stats.deaths,
        checkpoints = meta.checkpoints_passed,
        won = meta.won,
        winning_frames = wins,
        "Simulation finished"
    );
    Ok(())
}
