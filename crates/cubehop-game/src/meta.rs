//! Level-wide state that outlives individual frames

use glam::Vec3;

/// Run statistics shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameStats {
    /// Respawns since the level started
    pub deaths: u32,
    /// Seconds since the last respawn, frozen once the level is won
    pub elapsed: f32,
}

/// World meta-state: spawn point, progress and win/respawn flags
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMeta {
    pub spawn_point: Vec3,
    pub checkpoints_passed: u32,
    pub won: bool,
    /// Seconds since the win flag was raised
    pub time_since_game_over: f32,
    pub stats: GameStats,
    respawn_cue: bool,
}

impl WorldMeta {
    pub fn new(spawn_point: Vec3) -> Self {
        Self {
            spawn_point,
            checkpoints_passed: 0,
            won: false,
            time_since_game_over: 0.0,
            stats: GameStats::default(),
            respawn_cue: false,
        }
    }

    /// Whether a respawn sound is waiting to be played
    pub fn respawn_cue_pending(&self) -> bool {
        self.respawn_cue
    }

    /// Consume the one-shot respawn cue. Returns `true` at most once per respawn.
    pub fn take_respawn_cue(&mut self) -> bool {
        std::mem::take(&mut self.respawn_cue)
    }

    pub(crate) fn raise_respawn_cue(&mut self) {
        self.respawn_cue = true;
    }

    /// Advance the clocks by one frame
    pub(crate) fn tick(&mut self, dt: f32) {
        if self.won {
            self.time_since_game_over += dt;
        } else {
            self.stats.elapsed += dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respawn_cue_is_one_shot() {
        let mut meta = WorldMeta::new(Vec3::ZERO);
        assert!(!meta.take_respawn_cue());
        meta.raise_respawn_cue();
        assert!(meta.respawn_cue_pending());
        assert!(meta.take_respawn_cue());
        assert!(!meta.take_respawn_cue());
    }

    #[test]
    fn clocks_switch_on_win() {
        let mut meta = WorldMeta::new(Vec3::ZERO);
        meta.tick(1.0);
        meta.won = true;
        meta.tick(0.5);
        assert_eq!(meta.stats.elapsed, 1.0);
        assert_eq!(meta.time_since_game_over, 0.5);
    }
}
