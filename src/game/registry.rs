//! Player registry.
//!
//! Owns every registered `Player`, in join order, and hands out names and colors.

use crate::config::game::{DEFAULT_COLOR, DEFAULT_PLAYER_NAME, MAX_NAME_LEN, MAX_PLAYERS, PLAYER_COLORS};
use crate::game::entities::Player;
use crate::game::error::GameError;

#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

/// Trimmed, length-capped display name.
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_PLAYER_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player, or rename one that is already registered.
    pub fn join(&mut self, id: &str, name: &str) -> Result<&Player, GameError> {
        let username = sanitize_name(name);

        if let Some(idx) = self.index_of(id) {
            self.players[idx].username = username;
            return Ok(&self.players[idx]);
        }

        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::LobbyFull);
        }

        let color = self.free_color();
        self.players.push(Player::new(id.to_string(), username, color));
        Ok(&self.players[self.players.len() - 1])
    }

    /// Whether `id` could join right now.
    pub fn has_room_for(&self, id: &str) -> bool {
        self.contains(id) || self.players.len() < MAX_PLAYERS
    }

    pub fn remove(&mut self, id: &str) -> Option<Player> {
        self.index_of(id).map(|idx| self.players.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Like `get_mut`, but turns a miss into `UnknownPlayer`.
    pub fn require_mut(&mut self, id: &str) -> Result<&mut Player, GameError> {
        self.get_mut(id).ok_or_else(|| GameError::UnknownPlayer(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Display names in join order, as sent in `user-list`.
    pub fn usernames(&self) -> Vec<String> {
        self.players.iter().map(|p| p.username.clone()).collect()
    }

    /// Players currently on the map, other than `except`.
    pub fn spawned_except<'a>(&'a self, except: &'a str) -> impl Iterator<Item = &'a Player> + 'a {
        self.players.iter().filter(move |p| p.id != except && p.pos.is_some())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    fn free_color(&self) -> String {
        PLAYER_COLORS
            .iter()
            .find(|color| !self.players.iter().any(|p| p.color == **color))
            .unwrap_or(&DEFAULT_COLOR)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifth_join_is_refused() {
        let mut registry = PlayerRegistry::new();
        for i in 0..MAX_PLAYERS {
            registry.join(&format!("p{i}"), "name").unwrap();
        }
        assert_eq!(registry.join("p-extra", "late").unwrap_err(), GameError::LobbyFull);
        assert!(!registry.has_room_for("p-extra"));
        assert!(registry.has_room_for("p0"));
    }

    #[test]
    fn test_rejoin_renames_instead_of_adding() {
        let mut registry = PlayerRegistry::new();
        registry.join("p1", "Alice").unwrap();
        registry.join("p1", "  Alicia ").unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.usernames(), vec!["Alicia".to_string()]);
    }

    #[test]
    fn test_colors_are_unique_and_reused_after_leave() {
        let mut registry = PlayerRegistry::new();
        for i in 0..MAX_PLAYERS {
            registry.join(&format!("p{i}"), "x").unwrap();
        }
        let colors: Vec<_> = registry.iter().map(|p| p.color.clone()).collect();
        assert_eq!(colors, PLAYER_COLORS.iter().map(|c| c.to_string()).collect::<Vec<_>>());

        registry.remove("p1");
        let color = registry.join("p9", "x").unwrap().color.clone();
        assert_eq!(color, PLAYER_COLORS[1]);
    }

    #[test]
    fn test_names_are_sanitized() {
        assert_eq!(sanitize_name("   "), DEFAULT_PLAYER_NAME);
        assert_eq!(sanitize_name(&"a".repeat(50)).chars().count(), MAX_NAME_LEN);
    }
}
