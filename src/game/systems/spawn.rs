//! Spawn allocation.
//!
//! Hands out the four corner spawns first-fit, in declaration order, so that no
//! two players ever hold the same corner.

use crate::game::error::GameError;
use crate::game::grid::spawn_corners;
use crate::game::types::{PlayerId, Position};

#[derive(Debug)]
pub struct SpawnAllocator {
    corners: [Position; 4],
    holders: [Option<PlayerId>; 4],
}

impl SpawnAllocator {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            corners: spawn_corners(width, height),
            holders: Default::default(),
        }
    }

    /// Give `player_id` the first free corner, releasing whatever it held before.
    pub fn allocate(&mut self, player_id: &str) -> Result<Position, GameError> {
        self.release(player_id);
        let slot = self
            .holders
            .iter()
            .position(Option::is_none)
            .ok_or(GameError::NoSpawnAvailable)?;
        self.holders[slot] = Some(player_id.to_string());
        Ok(self.corners[slot])
    }

    /// Free the corner held by `player_id`, if any.
    pub fn release(&mut self, player_id: &str) -> Option<Position> {
        let slot = self.slot_of(player_id)?;
        self.holders[slot] = None;
        Some(self.corners[slot])
    }

    pub fn spawn_of(&self, player_id: &str) -> Option<Position> {
        self.slot_of(player_id).map(|slot| self.corners[slot])
    }

    fn slot_of(&self, player_id: &str) -> Option<usize> {
        self.holders
            .iter()
            .position(|holder| holder.as_deref() == Some(player_id))
    }
}
