use serde::{Serialize, Deserialize};

/// Stable player identity, taken from the `player_id` session cookie.
pub type PlayerId = String;

pub type BombId = u64;

pub type PowerupId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Builds a position from client-supplied coordinates, rejecting negatives.
    pub fn from_signed(x: i64, y: i64) -> Option<Self> {
        Some(Self {
            x: usize::try_from(x).ok()?,
            y: usize::try_from(y).ok()?,
        })
    }

    pub fn manhattan(&self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// One step in `direction`, or `None` when it would leave the positive quadrant.
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Destructible,
    Indestructible,
}

impl Cell {
    /// Numeric code used on the wire (`map-data`).
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Destructible => 1,
            Cell::Indestructible => 2,
        }
    }
}
