//! Player movement system.
//!
//! This module decides whether a requested step is legal.

use std::time::Instant;

use crate::game::entities::Player;
use crate::game::error::GameError;
use crate::game::grid::Grid;
use crate::game::types::Position;

/// Check a move of `player` to `target` at time `now`.
///
/// Accepted only if the player may act, its move interval has elapsed since the
/// last accepted move, the target is one orthogonal step away, inside the grid,
/// and empty. Returns the target on success.
pub fn validate_move(grid: &Grid, player: &Player, target: Position, now: Instant) -> Result<Position, GameError> {
    if !player.can_act() {
        return Err(GameError::InvalidRequest("player cannot move right now"));
    }
    let current = player.pos.ok_or(GameError::InvalidRequest("player is not spawned"))?;

    if let Some(last) = player.last_move {
        if now.saturating_duration_since(last) < player.stats.move_interval() {
            return Err(GameError::InvalidRequest("moving too fast"));
        }
    }

    if current.manhattan(target) != 1 {
        return Err(GameError::InvalidRequest("target is not adjacent"));
    }

    if !grid.contains(target) {
        return Err(GameError::InvalidRequest("target is out of bounds"));
    }

    if !grid.is_empty_cell(target) {
        return Err(GameError::InvalidRequest("target cell is blocked"));
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::DEFAULT_MOVE_INTERVAL_MS;
    use crate::game::types::Cell;
    use std::time::Duration;

    fn setup() -> (Grid, Player) {
        let mut grid = Grid::filled(5, 5, Cell::Empty);
        grid.set(Position::new(3, 2), Cell::Destructible);
        grid.set(Position::new(2, 1), Cell::Indestructible);
        let mut player = Player::new("p1".into(), "Alice".into(), "blue".into());
        player.begin_round(Position::new(2, 2));
        (grid, player)
    }

    #[test]
    fn test_accepts_single_step_into_empty_cell() {
        let (grid, player) = setup();
        let now = Instant::now();
        assert_eq!(validate_move(&grid, &player, Position::new(1, 2), now), Ok(Position::new(1, 2)));
        assert_eq!(validate_move(&grid, &player, Position::new(2, 3), now), Ok(Position::new(2, 3)));
    }

    #[test]
    fn test_rejects_diagonal_teleport_and_standing_still() {
        let (grid, player) = setup();
        let now = Instant::now();
        assert!(validate_move(&grid, &player, Position::new(3, 3), now).is_err());
        assert!(validate_move(&grid, &player, Position::new(2, 4), now).is_err());
        assert!(validate_move(&grid, &player, Position::new(2, 2), now).is_err());
    }

    #[test]
    fn test_rejects_walls_and_rubble() {
        let (grid, player) = setup();
        let now = Instant::now();
        assert!(validate_move(&grid, &player, Position::new(3, 2), now).is_err());
        assert!(validate_move(&grid, &player, Position::new(2, 1), now).is_err());
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let grid = Grid::filled(3, 3, Cell::Empty);
        let mut player = Player::new("p1".into(), "Alice".into(), "blue".into());
        player.begin_round(Position::new(2, 0));
        assert!(validate_move(&grid, &player, Position::new(3, 0), Instant::now()).is_err());
    }

    #[test]
    fn test_rate_limit_boundary() {
        let (grid, mut player) = setup();
        let t0 = Instant::now();
        player.last_move = Some(t0);
        let interval = Duration::from_millis(DEFAULT_MOVE_INTERVAL_MS);

        let too_soon = t0 + interval - Duration::from_millis(1);
        assert_eq!(
            validate_move(&grid, &player, Position::new(1, 2), too_soon),
            Err(GameError::InvalidRequest("moving too fast"))
        );
        assert!(validate_move(&grid, &player, Position::new(1, 2), t0 + interval).is_ok());
    }

    #[test]
    fn test_unspawned_or_waiting_players_cannot_move() {
        let (grid, mut player) = setup();
        player.awaiting_respawn = true;
        assert!(validate_move(&grid, &player, Position::new(1, 2), Instant::now()).is_err());

        player.awaiting_respawn = false;
        player.pos = None;
        assert!(validate_move(&grid, &player, Position::new(1, 2), Instant::now()).is_err());
    }
}
