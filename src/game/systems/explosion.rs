//! Flame propagation.
//!
//! Works out which cells a detonation reaches without mutating anything; the
//! state aggregate applies the result.

use crate::game::grid::Grid;
use crate::game::types::{Cell, Direction, Position};

/// Cells touched by one detonation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blast {
    /// Every cell covered by flame, origin first.
    pub cells: Vec<Position>,
    /// Destructible cells the flame broke. Also listed in `cells`.
    pub destroyed: Vec<Position>,
}

impl Blast {
    pub fn covers(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Propagate a blast of `radius` from `origin`.
///
/// Each of the four rays advances up to `radius` cells. A ray stops before an
/// indestructible cell or the grid edge, and stops on the first destructible
/// cell, which it breaks.
pub fn propagate(grid: &Grid, origin: Position, radius: usize) -> Blast {
    let mut blast = Blast {
        cells: vec![origin],
        destroyed: Vec::new(),
    };

    for direction in Direction::ALL {
        let mut cursor = origin;
        for _ in 0..radius {
            let Some(next) = cursor.step(direction) else { break };
            match grid.get(next) {
                None | Some(Cell::Indestructible) => break,
                Some(Cell::Destructible) => {
                    blast.cells.push(next);
                    blast.destroyed.push(next);
                    break;
                }
                Some(Cell::Empty) => {
                    blast.cells.push(next);
                    cursor = next;
                }
            }
        }
    }

    blast
}
