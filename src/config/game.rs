/// Game configuration constants.
///
/// This module defines the main gameplay parameters such as grid dimensions,
/// bomb fuse, player stat defaults and powerup drop weights.
use std::time::Duration;

/// Number of columns in the game grid.
pub const GRID_WIDTH: usize = 15;

/// Number of rows in the game grid.
pub const GRID_HEIGHT: usize = 13;

/// Probability that a free interior cell is generated as destructible rubble.
pub const DESTRUCTIBLE_CHANCE: f64 = 0.4;

/// Maximum number of registered players (one per spawn corner).
pub const MAX_PLAYERS: usize = 4;

/// Delay between placing a bomb and its detonation, in milliseconds.
pub const BOMB_FUSE_MS: u64 = 2000;

/// Lives granted at the start of a round.
pub const STARTING_LIVES: u8 = 3;

/// Bombs a player may have on the field at once before any powerup.
pub const DEFAULT_MAX_BOMBS: u32 = 1;

/// Flame ray length before any powerup.
pub const DEFAULT_FLAME_RANGE: usize = 1;

/// Minimum time between two accepted moves before any powerup.
pub const DEFAULT_MOVE_INTERVAL_MS: u64 = 150;

/// How much a speed powerup shortens the move interval.
pub const SPEED_STEP_MS: u64 = 20;

/// Floor for the move interval.
pub const MIN_MOVE_INTERVAL_MS: u64 = 30;

/// Powerup drop weights, out of `POWERUP_WEIGHT_TOTAL`, rolled once per destroyed cell.
pub const POWERUP_CAPACITY_WEIGHT: u32 = 10;
pub const POWERUP_RANGE_WEIGHT: u32 = 10;
pub const POWERUP_SPEED_WEIGHT: u32 = 10;
pub const POWERUP_WEIGHT_TOTAL: u32 = 100;

/// Player colors, handed out first-available in this order.
pub const PLAYER_COLORS: [&str; MAX_PLAYERS] = ["blue", "red", "green", "yellow"];

/// Color used if the palette is exhausted.
pub const DEFAULT_COLOR: &str = "blue";

/// Name used when a player joins with a blank one.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Display names are cut to this many characters.
pub const MAX_NAME_LEN: usize = 20;

/// Chat messages are cut to this many characters.
pub const MAX_CHAT_LEN: usize = 200;

/// Runtime-tunable subset of the game configuration.
///
/// Production uses [`GameSettings::default`]; tests shrink the fuse so scheduled
/// detonations can be observed quickly.
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub grid_width: usize,
    pub grid_height: usize,
    pub bomb_fuse: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            bomb_fuse: Duration::from_millis(BOMB_FUSE_MS),
        }
    }
}
