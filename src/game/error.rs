//! Rejection reasons for player intents.

use super::types::PlayerId;

/// Every way the game can refuse an intent.
///
/// Capacity variants are user-visible; the rest are dropped silently since they
/// usually come from a stale or racing client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Lobby is full")]
    LobbyFull,
    #[error("No spawn position available")]
    NoSpawnAvailable,
    #[error("Bomb limit reached ({max} active)")]
    BombLimitReached { max: u32 },
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("Invalid request: {0}")]
    InvalidRequest(&'static str),
}

impl GameError {
    /// Whether the client should be told about the rejection.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            GameError::LobbyFull | GameError::NoSpawnAvailable | GameError::BombLimitReached { .. }
        )
    }

    /// Join-time capacity violations end the connection.
    pub fn closes_connection(&self) -> bool {
        matches!(self, GameError::LobbyFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(GameError::LobbyFull.is_user_visible());
        assert!(GameError::LobbyFull.closes_connection());
        assert!(GameError::BombLimitReached { max: 1 }.is_user_visible());
        assert!(!GameError::BombLimitReached { max: 1 }.closes_connection());
        assert!(!GameError::InvalidRequest("wall").is_user_visible());
        assert!(!GameError::UnknownPlayer("p".into()).is_user_visible());
    }

    #[test]
    fn messages_match_client_expectations() {
        // Clients look for this phrase to route back to the name screen.
        assert!(GameError::LobbyFull.to_string().contains("Lobby is full"));
        assert_eq!(GameError::BombLimitReached { max: 2 }.to_string(), "Bomb limit reached (2 active)");
    }
}
