//! Bomb entity.

use crate::game::types::{BombId, PlayerId, Position};

/// A placed bomb waiting for its fuse.
///
/// The blast radius is copied from the owner's stats at placement, so powerups
/// picked up while the fuse burns do not change this bomb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bomb {
    pub id: BombId,
    pub owner: PlayerId,
    pub pos: Position,
    pub radius: usize,
}
