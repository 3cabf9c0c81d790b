//! Grid storage and map generation.

use rand::Rng;

use crate::config::game::DESTRUCTIBLE_CHANCE;
use crate::game::types::{Cell, Position};

/// Authoritative map, stored row-major as `cells[y][x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// A grid filled with `cell`. Mostly useful to hand-build maps in tests.
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            cells: vec![vec![cell; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.y < self.height() && pos.x < self.width()
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    /// Overwrites a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(pos.y).and_then(|row| row.get_mut(pos.x)) {
            *slot = cell;
        }
    }

    pub fn is_empty_cell(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    /// Numeric rows as sent in `map-data`.
    pub fn codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect()
    }
}

/// The four spawn corners, in allocation order.
pub fn spawn_corners(width: usize, height: usize) -> [Position; 4] {
    let right = width.saturating_sub(2);
    let bottom = height.saturating_sub(2);
    [
        Position::new(1, 1),
        Position::new(right, 1),
        Position::new(1, bottom),
        Position::new(right, bottom),
    ]
}

/// Cells kept clear around each spawn: the corner itself and its two inward neighbours.
pub fn is_spawn_safe_zone(x: usize, y: usize, width: usize, height: usize) -> bool {
    let pos = Position::new(x, y);
    spawn_corners(width, height).iter().any(|corner| {
        let inward_x = if corner.x <= 1 { corner.x + 1 } else { corner.x - 1 };
        let inward_y = if corner.y <= 1 { corner.y + 1 } else { corner.y - 1 };
        pos == *corner
            || pos == Position::new(inward_x, corner.y)
            || pos == Position::new(corner.x, inward_y)
    })
}

/// Generate a fresh map.
///
/// Border cells and the interior checkerboard (even `x`, even `y`) are walls,
/// spawn zones are always empty, and every other cell becomes rubble with
/// probability [`DESTRUCTIBLE_CHANCE`].
pub fn generate_grid(width: usize, height: usize, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::filled(width, height, Cell::Empty);

    for y in 0..height {
        for x in 0..width {
            let cell = if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                Cell::Indestructible
            } else if is_spawn_safe_zone(x, y, width, height) {
                Cell::Empty
            } else if x % 2 == 0 && y % 2 == 0 {
                Cell::Indestructible
            } else if rng.random_bool(DESTRUCTIBLE_CHANCE) {
                Cell::Destructible
            } else {
                Cell::Empty
            };
            grid.set(Position::new(x, y), cell);
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::{GRID_HEIGHT, GRID_WIDTH};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_grid_generation_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = generate_grid(GRID_WIDTH, GRID_HEIGHT, &mut rng);
        assert_eq!(grid.width(), GRID_WIDTH);
        assert_eq!(grid.height(), GRID_HEIGHT);
        assert_eq!(grid.codes().len(), GRID_HEIGHT);
    }

    #[test]
    fn test_border_and_spawn_invariants_hold_for_many_seeds() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = generate_grid(GRID_WIDTH, GRID_HEIGHT, &mut rng);

            for x in 0..GRID_WIDTH {
                assert_eq!(grid.get(Position::new(x, 0)), Some(Cell::Indestructible));
                assert_eq!(grid.get(Position::new(x, GRID_HEIGHT - 1)), Some(Cell::Indestructible));
            }
            for y in 0..GRID_HEIGHT {
                assert_eq!(grid.get(Position::new(0, y)), Some(Cell::Indestructible));
                assert_eq!(grid.get(Position::new(GRID_WIDTH - 1, y)), Some(Cell::Indestructible));
            }

            let mut safe = 0;
            for y in 0..GRID_HEIGHT {
                for x in 0..GRID_WIDTH {
                    if is_spawn_safe_zone(x, y, GRID_WIDTH, GRID_HEIGHT) {
                        safe += 1;
                        assert_eq!(grid.get(Position::new(x, y)), Some(Cell::Empty), "seed {seed} ({x},{y})");
                    }
                }
            }
            assert_eq!(safe, 12);
        }
    }

    #[test]
    fn test_checkerboard_is_indestructible() {
        let mut rng = StdRng::seed_from_u64(9);
        let grid = generate_grid(GRID_WIDTH, GRID_HEIGHT, &mut rng);
        for y in (2..GRID_HEIGHT - 1).step_by(2) {
            for x in (2..GRID_WIDTH - 1).step_by(2) {
                assert_eq!(grid.get(Position::new(x, y)), Some(Cell::Indestructible));
            }
        }
    }

    #[test]
    fn test_spawn_corners_are_inside_the_safe_zone() {
        for corner in spawn_corners(GRID_WIDTH, GRID_HEIGHT) {
            assert!(is_spawn_safe_zone(corner.x, corner.y, GRID_WIDTH, GRID_HEIGHT));
        }
        assert_eq!(spawn_corners(GRID_WIDTH, GRID_HEIGHT)[3], Position::new(13, 11));
    }

    #[test]
    fn test_regeneration_produces_rubble() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = generate_grid(GRID_WIDTH, GRID_HEIGHT, &mut rng);
        let rubble = grid.codes().iter().flatten().filter(|&&c| c == 1).count();
        assert!(rubble > 0);
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut grid = Grid::filled(3, 3, Cell::Empty);
        grid.set(Position::new(5, 5), Cell::Destructible);
        assert_eq!(grid.get(Position::new(5, 5)), None);
        assert!(!grid.contains(Position::new(3, 0)));
    }
}
