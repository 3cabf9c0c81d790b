//! Application state for the HTTP server.
//!
//! Holds the address of the game server actor so WebSocket handlers can reach it.

use actix::Addr;
use crate::server::game_server::GameServer;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    pub game_server: Addr<GameServer>,
}

impl AppState {
    pub fn new(game_server: Addr<GameServer>) -> Self {
        AppState { game_server }
    }
}
