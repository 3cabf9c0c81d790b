//! Wire protocol.
//!
//! Every frame is a JSON object tagged by `type`. Inbound frames decode into
//! [`ClientMessage`]; everything the server emits is a [`ServerMessage`].

use actix::prelude::*;
use serde::{Serialize, Deserialize};

use crate::game::entities::{Powerup, PowerupKind};
use crate::game::types::{PlayerId, Position, PowerupId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatPayload {
    pub id: PlayerId,
    pub room: String,
    pub text: String,
}

// Message client -> serveur
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    NewUser {
        id: PlayerId,
        #[serde(default)]
        name: String,
    },
    StartGame {
        id: PlayerId,
    },
    RequestMap,
    PlayerMove {
        id: PlayerId,
        x: i64,
        y: i64,
    },
    Bomb {
        id: PlayerId,
        x: i64,
        y: i64,
    },
    #[serde(rename_all = "camelCase")]
    PickupPowerup {
        id: PlayerId,
        powerup_id: PowerupId,
    },
    Respawn {
        id: PlayerId,
    },
    ChatMessage {
        payload: ChatPayload,
    },
    CheckJoin,
}

/// A player as listed in `existing-players`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub x: usize,
    pub y: usize,
    pub color: String,
}

// Message serveur -> client
#[derive(Message, Serialize, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    MapData {
        grid: Vec<Vec<u8>>,
    },
    UserList {
        users: Vec<String>,
    },
    SpawnPosition {
        id: PlayerId,
        x: usize,
        y: usize,
        color: String,
    },
    ExistingPlayers {
        players: Vec<PlayerSnapshot>,
    },
    PlayerMove {
        id: PlayerId,
        x: usize,
        y: usize,
    },
    Bomb {
        id: PlayerId,
        x: usize,
        y: usize,
    },
    Explosion {
        id: PlayerId,
        x: usize,
        y: usize,
        cells: Vec<Position>,
        destroyed: Vec<Position>,
    },
    PlayerHit {
        id: PlayerId,
        lives: u8,
    },
    PowerupSpawn {
        powerup: Powerup,
    },
    #[serde(rename_all = "camelCase")]
    PowerupPicked {
        id: PowerupId,
        by: PlayerId,
        powerup_type: PowerupKind,
        new_max_bombs: u32,
        new_flame_range: usize,
        new_move_interval_ms: u64,
        new_speed_level: u32,
    },
    PlayerDisconnect {
        id: PlayerId,
    },
    ChatMessage {
        room: String,
        from: String,
        text: String,
        id: PlayerId,
    },
    Error {
        message: String,
    },
    CheckJoinResponse {
        allowed: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ServerMessage {
    pub fn error(message: &str) -> Self {
        Self::Error { message: message.to_string() }
    }

    pub fn player_move(id: &str, pos: Position) -> Self {
        Self::PlayerMove { id: id.to_string(), x: pos.x, y: pos.y }
    }
}

/// Tells a session actor to close its socket.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct CloseSession {
    pub reason: String,
}

/// Where a message produced by the game state should go.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch {
    /// Every open session.
    All(ServerMessage),
    /// The session of one player.
    To(PlayerId, ServerMessage),
}

#[cfg(test)]
impl Dispatch {
    pub fn message(&self) -> &ServerMessage {
        match self {
            Dispatch::All(message) | Dispatch::To(_, message) => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_every_inbound_tag() {
        let frames = [
            json!({"type": "new-user", "id": "a", "name": "Alice"}),
            json!({"type": "start-game", "id": "a"}),
            json!({"type": "request-map"}),
            json!({"type": "player-move", "id": "a", "x": 2, "y": 1}),
            json!({"type": "bomb", "id": "a", "x": 1, "y": 1}),
            json!({"type": "pickup-powerup", "id": "a", "powerupId": 4}),
            json!({"type": "respawn", "id": "a"}),
            json!({"type": "chat-message", "payload": {"id": "a", "room": "lobby", "text": "hi"}}),
            json!({"type": "check-join"}),
        ];
        for frame in frames {
            let parsed: Result<ClientMessage, _> = serde_json::from_value(frame.clone());
            assert!(parsed.is_ok(), "failed to parse {frame}");
        }

        let pickup: ClientMessage =
            serde_json::from_value(json!({"type": "pickup-powerup", "id": "a", "powerupId": 4})).unwrap();
        assert_eq!(pickup, ClientMessage::PickupPowerup { id: "a".into(), powerup_id: 4 });
    }

    #[test]
    fn test_rejects_unknown_tag_and_missing_fields() {
        assert!(serde_json::from_value::<ClientMessage>(json!({"type": "teleport", "id": "a"})).is_err());
        assert!(serde_json::from_value::<ClientMessage>(json!({"type": "player-move", "id": "a"})).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn test_outbound_shapes() {
        let picked = ServerMessage::PowerupPicked {
            id: 3,
            by: "a".into(),
            powerup_type: PowerupKind::Speed,
            new_max_bombs: 1,
            new_flame_range: 1,
            new_move_interval_ms: 130,
            new_speed_level: 1,
        };
        assert_eq!(
            serde_json::to_value(&picked).unwrap(),
            json!({
                "type": "powerup-picked",
                "id": 3,
                "by": "a",
                "powerupType": "speed",
                "newMaxBombs": 1,
                "newFlameRange": 1,
                "newMoveIntervalMs": 130,
                "newSpeedLevel": 1
            })
        );

        let allowed = ServerMessage::CheckJoinResponse { allowed: true, message: None };
        assert_eq!(
            serde_json::to_value(&allowed).unwrap(),
            json!({"type": "check-join-response", "allowed": true})
        );

        assert_eq!(
            serde_json::to_value(ServerMessage::error("Lobby is full")).unwrap(),
            json!({"type": "error", "message": "Lobby is full"})
        );
    }
}
