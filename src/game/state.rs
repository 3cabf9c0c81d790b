//! The game state aggregate.
//!
//! `GameState` owns the grid, the player registry, spawn assignments, live bombs
//! and powerups. Every intent and every timer firing goes through one of its
//! methods, which validate against the current state, mutate it, and return the
//! messages to fan out. It knows nothing about sockets or timers.

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use crate::config::game::GameSettings;
use crate::game::entities::{Bomb, roll_powerup, PowerupRegistry, Player};
use crate::game::error::GameError;
use crate::game::grid::{generate_grid, Grid};
use crate::game::registry::PlayerRegistry;
use crate::game::systems::{propagate, validate_move, SpawnAllocator};
use crate::game::types::{BombId, Cell, Position, PowerupId};
use crate::server::messages::{Dispatch, PlayerSnapshot, ServerMessage};

pub struct GameState {
    pub settings: GameSettings,
    pub grid: Grid,
    pub players: PlayerRegistry,
    pub spawns: SpawnAllocator,
    pub bombs: HashMap<BombId, Bomb>,
    pub powerups: PowerupRegistry,
    next_bomb_id: BombId,
    rng: StdRng,
}

impl GameState {
    pub fn new(settings: GameSettings) -> Self {
        Self::with_rng(settings, StdRng::from_rng(&mut rand::rng()))
    }

    /// Build a state driven by the given RNG (seeded in tests).
    pub fn with_rng(settings: GameSettings, mut rng: StdRng) -> Self {
        let grid = generate_grid(settings.grid_width, settings.grid_height, &mut rng);
        let spawns = SpawnAllocator::new(settings.grid_width, settings.grid_height);
        GameState {
            settings,
            grid,
            players: PlayerRegistry::new(),
            spawns,
            bombs: HashMap::new(),
            powerups: PowerupRegistry::new(),
            next_bomb_id: 0,
            rng,
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn map_data(&self) -> ServerMessage {
        ServerMessage::MapData { grid: self.grid.codes() }
    }

    fn user_list(&self) -> ServerMessage {
        ServerMessage::UserList { users: self.players.usernames() }
    }

    /// Answer a `check-join` pre-flight.
    pub fn check_join(&self, id: &str) -> ServerMessage {
        if self.players.has_room_for(id) {
            ServerMessage::CheckJoinResponse { allowed: true, message: None }
        } else {
            ServerMessage::CheckJoinResponse {
                allowed: false,
                message: Some(GameError::LobbyFull.to_string()),
            }
        }
    }

    /// Register (or rename) a player and broadcast the lobby list.
    pub fn join(&mut self, id: &str, name: &str) -> Result<Vec<Dispatch>, GameError> {
        let player = self.players.join(id, name)?;
        info!("[GameState] Player {} joined as '{}' ({})", id, player.username, player.color);
        Ok(vec![Dispatch::All(self.user_list())])
    }

    /// Put a player on the map.
    ///
    /// If nobody else is spawned the round is idle, so the map is regenerated
    /// and broadcast. Otherwise the player drops into the running round and is
    /// sent the current map, the other players and the live powerups. A running
    /// round only takes players that are neither on the map nor eliminated.
    pub fn start(&mut self, id: &str) -> Result<Vec<Dispatch>, GameError> {
        let player = self
            .players
            .get(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.to_string()))?;
        let fresh_round = self.players.spawned_except(id).next().is_none();
        if !fresh_round {
            if player.pos.is_some() {
                return Err(GameError::InvalidRequest("player is already in the round"));
            }
            if player.eliminated {
                return Err(GameError::InvalidRequest("player was eliminated this round"));
            }
        }

        let spawn = self.spawns.allocate(id)?;
        if fresh_round {
            self.reset_round();
        }

        let player = self.players.require_mut(id)?;
        player.begin_round(spawn);
        let color = player.color.clone();
        info!("[GameState] Player {} spawned at ({}, {}) fresh_round={}", id, spawn.x, spawn.y, fresh_round);

        let mut dispatches = Vec::new();
        if fresh_round {
            dispatches.push(Dispatch::All(self.map_data()));
        } else {
            dispatches.push(Dispatch::To(id.to_string(), self.map_data()));
        }
        dispatches.push(Dispatch::All(ServerMessage::SpawnPosition {
            id: id.to_string(),
            x: spawn.x,
            y: spawn.y,
            color,
        }));

        let others: Vec<PlayerSnapshot> = self
            .players
            .spawned_except(id)
            .filter_map(|p| {
                p.pos.map(|pos| PlayerSnapshot {
                    id: p.id.clone(),
                    x: pos.x,
                    y: pos.y,
                    color: p.color.clone(),
                })
            })
            .collect();
        dispatches.push(Dispatch::To(id.to_string(), ServerMessage::ExistingPlayers { players: others }));

        for powerup in self.powerups.iter() {
            dispatches.push(Dispatch::To(
                id.to_string(),
                ServerMessage::PowerupSpawn { powerup: powerup.clone() },
            ));
        }

        Ok(dispatches)
    }

    /// Fresh map for a new round. Outstanding bombs and powerups belong to the
    /// old map and are dropped along with every player's bomb count.
    fn reset_round(&mut self) {
        self.grid = generate_grid(self.settings.grid_width, self.settings.grid_height, &mut self.rng);
        self.bombs.clear();
        self.powerups.clear();
        for player in self.players.iter_mut() {
            player.active_bombs = 0;
            player.eliminated = false;
        }
        info!("[GameState] New round: map regenerated");
    }

    /// Validated single-step move, followed by auto-pickup on the new cell.
    pub fn move_player(&mut self, id: &str, x: i64, y: i64, now: Instant) -> Result<Vec<Dispatch>, GameError> {
        let target = Position::from_signed(x, y).ok_or(GameError::InvalidRequest("negative coordinates"))?;
        let player = self
            .players
            .get(id)
            .ok_or_else(|| GameError::UnknownPlayer(id.to_string()))?;
        validate_move(&self.grid, player, target, now)?;

        let player = self.players.require_mut(id)?;
        player.pos = Some(target);
        player.last_move = Some(now);

        let mut dispatches = vec![Dispatch::All(ServerMessage::player_move(id, target))];
        if let Some(powerup_id) = self.powerups.at(target).map(|p| p.id) {
            if let Ok(picked) = self.pickup(id, powerup_id) {
                dispatches.extend(picked);
            }
        }
        Ok(dispatches)
    }

    /// Place a bomb on the player's own cell. Returns the bomb id so the caller
    /// can schedule its detonation.
    pub fn place_bomb(&mut self, id: &str, x: i64, y: i64) -> Result<(BombId, Vec<Dispatch>), GameError> {
        let target = Position::from_signed(x, y).ok_or(GameError::InvalidRequest("negative coordinates"))?;
        let player = self.players.require_mut(id)?;
        if !player.can_act() {
            return Err(GameError::InvalidRequest("player cannot place bombs right now"));
        }
        if player.pos != Some(target) {
            return Err(GameError::InvalidRequest("bombs go on the player's own cell"));
        }
        if player.active_bombs >= player.stats.max_bombs {
            return Err(GameError::BombLimitReached { max: player.stats.max_bombs });
        }
        if self.bombs.values().any(|b| b.pos == target) {
            return Err(GameError::InvalidRequest("cell already holds a bomb"));
        }

        player.active_bombs += 1;
        self.next_bomb_id += 1;
        let bomb = Bomb {
            id: self.next_bomb_id,
            owner: id.to_string(),
            pos: target,
            radius: player.stats.flame_range,
        };
        debug!(
            "[GameState] Bomb {} placed by {} at ({}, {}) radius={} active={}/{}",
            bomb.id, id, target.x, target.y, bomb.radius, player.active_bombs, player.stats.max_bombs
        );
        let bomb_id = bomb.id;
        self.bombs.insert(bomb_id, bomb);

        Ok((
            bomb_id,
            vec![Dispatch::All(ServerMessage::Bomb { id: id.to_string(), x: target.x, y: target.y })],
        ))
    }

    /// Detonate a bomb by id.
    ///
    /// A bomb that no longer exists (cleared by a new round) is a no-op. The
    /// owner, if still registered, gets its bomb slot back before anything else
    /// happens.
    pub fn detonate(&mut self, bomb_id: BombId) -> Vec<Dispatch> {
        let Some(bomb) = self.bombs.remove(&bomb_id) else {
            debug!("[GameState] Bomb {} no longer exists, skipping detonation", bomb_id);
            return Vec::new();
        };
        if let Some(owner) = self.players.get_mut(&bomb.owner) {
            owner.release_bomb();
        }

        let blast = propagate(&self.grid, bomb.pos, bomb.radius);
        for cell in &blast.destroyed {
            self.grid.set(*cell, Cell::Empty);
        }
        debug!(
            "[GameState] Bomb {} of {} exploded: {} cells, {} destroyed",
            bomb.id,
            bomb.owner,
            blast.cells.len(),
            blast.destroyed.len()
        );

        let mut dispatches = vec![Dispatch::All(ServerMessage::Explosion {
            id: bomb.owner.clone(),
            x: bomb.pos.x,
            y: bomb.pos.y,
            cells: blast.cells.clone(),
            destroyed: blast.destroyed.clone(),
        })];

        for cell in &blast.destroyed {
            let Some(kind) = roll_powerup(&mut self.rng) else { continue };
            if let Some(powerup) = self.powerups.spawn(kind, *cell) {
                dispatches.push(Dispatch::All(ServerMessage::PowerupSpawn { powerup }));
            }
        }

        for player in self.players.iter_mut() {
            let standing_in_flame = player.pos.is_some_and(|pos| blast.covers(pos));
            if standing_in_flame && player.can_act() {
                let lives = player.take_hit();
                info!("[GameState] Player {} hit by bomb {}, {} lives left", player.id, bomb.id, lives);
                dispatches.push(Dispatch::All(ServerMessage::PlayerHit { id: player.id.clone(), lives }));
            }
        }

        dispatches
    }

    /// Pick up a powerup the player is standing on. First claimant wins.
    pub fn pickup(&mut self, id: &str, powerup_id: PowerupId) -> Result<Vec<Dispatch>, GameError> {
        let player = self.players.require_mut(id)?;
        let pos = player.pos.ok_or(GameError::InvalidRequest("player is not spawned"))?;
        let powerup = self
            .powerups
            .take(powerup_id, pos)
            .ok_or(GameError::InvalidRequest("powerup is gone or not under the player"))?;

        player.stats.apply(powerup.kind);
        info!("[GameState] Player {} picked up {:?} (powerup {})", id, powerup.kind, powerup.id);

        Ok(vec![Dispatch::All(ServerMessage::PowerupPicked {
            id: powerup.id,
            by: id.to_string(),
            powerup_type: powerup.kind,
            new_max_bombs: player.stats.max_bombs,
            new_flame_range: player.stats.flame_range,
            new_move_interval_ms: player.stats.move_interval_ms,
            new_speed_level: player.stats.speed_level,
        })])
    }

    /// Put a hit player back on its spawn.
    pub fn respawn(&mut self, id: &str) -> Result<Vec<Dispatch>, GameError> {
        let spawn = self.spawns.spawn_of(id);
        let player = self.players.require_mut(id)?;
        if !player.awaiting_respawn || player.lives == 0 {
            return Err(GameError::InvalidRequest("player is not waiting to respawn"));
        }
        let spawn = spawn.ok_or(GameError::InvalidRequest("player has no spawn"))?;

        player.pos = Some(spawn);
        player.awaiting_respawn = false;
        player.last_move = None;
        Ok(vec![Dispatch::All(ServerMessage::player_move(id, spawn))])
    }

    /// Deregister a player and free its spawn. Its bombs keep burning.
    pub fn leave(&mut self, id: &str) -> Vec<Dispatch> {
        let Some(player) = self.players.remove(id) else {
            return Vec::new();
        };
        self.spawns.release(id);
        info!("[GameState] Player {} ('{}') left", id, player.username);
        vec![
            Dispatch::All(ServerMessage::PlayerDisconnect { id: id.to_string() }),
            Dispatch::All(self.user_list()),
        ]
    }
}
