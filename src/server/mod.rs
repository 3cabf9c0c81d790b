//! Server layer root module.
//!
//! This module organizes the networking side of the game:
//! - Application state and HTTP/WebSocket routing
//! - The per-connection WebSocket session actor
//! - The game server actor that owns the game state
//! - Message fan-out and the chat relay

pub mod state;
pub mod router;
pub mod messages;
pub mod session;
pub mod game_server;
pub mod broadcast;
pub mod chat;
pub mod ws_error;
