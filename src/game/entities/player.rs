use std::time::{Duration, Instant};

use crate::config::game::{
    DEFAULT_FLAME_RANGE, DEFAULT_MAX_BOMBS, DEFAULT_MOVE_INTERVAL_MS, MIN_MOVE_INTERVAL_MS,
    SPEED_STEP_MS, STARTING_LIVES,
};
use crate::game::entities::powerup::PowerupKind;
use crate::game::types::{PlayerId, Position};

/// Stats that powerups improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub max_bombs: u32,
    pub flame_range: usize,
    pub move_interval_ms: u64,
    pub speed_level: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_bombs: DEFAULT_MAX_BOMBS,
            flame_range: DEFAULT_FLAME_RANGE,
            move_interval_ms: DEFAULT_MOVE_INTERVAL_MS,
            speed_level: 0,
        }
    }
}

impl PlayerStats {
    pub fn apply(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Capacity => self.max_bombs += 1,
            PowerupKind::Range => self.flame_range += 1,
            PowerupKind::Speed => {
                self.move_interval_ms = self
                    .move_interval_ms
                    .saturating_sub(SPEED_STEP_MS)
                    .max(MIN_MOVE_INTERVAL_MS);
                self.speed_level += 1;
            }
        }
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub color: String,
    /// `None` until the player starts a round, and again once eliminated.
    pub pos: Option<Position>,
    pub stats: PlayerStats,
    pub active_bombs: u32,
    pub last_move: Option<Instant>,
    pub lives: u8,
    pub awaiting_respawn: bool,
    /// Lost its last life in the current round.
    pub eliminated: bool,
}

impl Player {
    pub fn new(id: PlayerId, username: String, color: String) -> Self {
        Self {
            id,
            username,
            color,
            pos: None,
            stats: PlayerStats::default(),
            active_bombs: 0,
            last_move: None,
            lives: STARTING_LIVES,
            awaiting_respawn: false,
            eliminated: false,
        }
    }

    /// Place the player on `spawn` with fresh lives and stats.
    ///
    /// `active_bombs` is left alone: bombs still burning in the current round
    /// will decrement it when they go off.
    pub fn begin_round(&mut self, spawn: Position) {
        self.pos = Some(spawn);
        self.stats = PlayerStats::default();
        self.last_move = None;
        self.lives = STARTING_LIVES;
        self.awaiting_respawn = false;
        self.eliminated = false;
    }

    /// Spawned, alive and not waiting to respawn.
    pub fn can_act(&self) -> bool {
        self.pos.is_some() && self.lives > 0 && !self.awaiting_respawn
    }

    /// Take one flame hit. Returns the remaining lives.
    pub fn take_hit(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.pos = None;
            self.awaiting_respawn = false;
            self.eliminated = true;
        } else {
            self.awaiting_respawn = true;
        }
        self.lives
    }

    pub fn release_bomb(&mut self) {
        self.active_bombs = self.active_bombs.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new("p1".into(), "Alice".into(), "blue".into())
    }

    #[test]
    fn test_speed_powerup_is_floored() {
        let mut stats = PlayerStats::default();
        for _ in 0..20 {
            stats.apply(PowerupKind::Speed);
        }
        assert_eq!(stats.move_interval_ms, MIN_MOVE_INTERVAL_MS);
        assert_eq!(stats.speed_level, 20);
    }

    #[test]
    fn test_capacity_and_range_powerups() {
        let mut stats = PlayerStats::default();
        stats.apply(PowerupKind::Capacity);
        stats.apply(PowerupKind::Range);
        assert_eq!(stats.max_bombs, DEFAULT_MAX_BOMBS + 1);
        assert_eq!(stats.flame_range, DEFAULT_FLAME_RANGE + 1);
    }

    #[test]
    fn test_hits_until_elimination() {
        let mut p = player();
        p.begin_round(Position::new(1, 1));
        assert!(p.can_act());

        assert_eq!(p.take_hit(), STARTING_LIVES - 1);
        assert!(p.awaiting_respawn);
        assert!(!p.can_act());

        for _ in 1..STARTING_LIVES {
            p.take_hit();
        }
        assert_eq!(p.lives, 0);
        assert_eq!(p.pos, None);
        assert!(!p.awaiting_respawn);
        assert!(p.eliminated);

        p.begin_round(Position::new(1, 1));
        assert!(!p.eliminated);
        assert_eq!(p.lives, STARTING_LIVES);
    }

    #[test]
    fn test_release_bomb_never_underflows() {
        let mut p = player();
        p.release_bomb();
        assert_eq!(p.active_bombs, 0);
    }
}
