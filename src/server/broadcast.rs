//! Fan-out of server messages to connected sessions.
//!
//! The dispatcher is owned by the game server actor. Delivery never blocks: a
//! session whose mailbox is closed or full is skipped and logged.

use std::collections::HashMap;

use actix::prelude::*;
use log::{debug, warn};
use uuid::Uuid;

use crate::game::types::PlayerId;
use crate::server::messages::{CloseSession, Dispatch, ServerMessage};

/// One attached WebSocket session.
#[derive(Clone)]
pub struct Connection {
    pub session_id: Uuid,
    pub outbox: Recipient<ServerMessage>,
    pub closer: Recipient<CloseSession>,
    /// Last chat room this session wrote to.
    pub room: Option<String>,
}

impl Connection {
    pub fn new(session_id: Uuid, outbox: Recipient<ServerMessage>, closer: Recipient<CloseSession>) -> Self {
        Self { session_id, outbox, closer, room: None }
    }
}

#[derive(Default)]
pub struct Dispatcher {
    connections: HashMap<PlayerId, Connection>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a session for `player_id`. Returns the connection it replaces, if any.
    pub fn attach(&mut self, player_id: &str, connection: Connection) -> Option<Connection> {
        self.connections.insert(player_id.to_string(), connection)
    }

    /// Detach the session only if it is still the current one for this player.
    pub fn detach(&mut self, player_id: &str, session_id: Uuid) -> bool {
        if self.is_current(player_id, session_id) {
            self.connections.remove(player_id);
            true
        } else {
            false
        }
    }

    pub fn is_current(&self, player_id: &str, session_id: Uuid) -> bool {
        self.connections
            .get(player_id)
            .is_some_and(|c| c.session_id == session_id)
    }

    pub fn set_room(&mut self, player_id: &str, room: &str) {
        if let Some(connection) = self.connections.get_mut(player_id) {
            connection.room = Some(room.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn send_to(&self, player_id: &str, message: ServerMessage) {
        match self.connections.get(player_id) {
            Some(connection) => Self::push(player_id, connection, message),
            None => debug!("[Dispatcher] No session for {}, dropping message", player_id),
        }
    }

    pub fn broadcast(&self, message: &ServerMessage) {
        for (player_id, connection) in &self.connections {
            Self::push(player_id, connection, message.clone());
        }
    }

    /// Deliver to every session whose last-known room is `room`.
    pub fn broadcast_room(&self, room: &str, message: &ServerMessage) {
        for (player_id, connection) in &self.connections {
            if connection.room.as_deref() == Some(room) {
                Self::push(player_id, connection, message.clone());
            }
        }
    }

    /// Send one error then ask the session to close.
    pub fn close(&self, player_id: &str, reason: &str) {
        let Some(connection) = self.connections.get(player_id) else { return };
        Self::push(player_id, connection, ServerMessage::error(reason));
        Self::kick(player_id, connection, reason);
    }

    /// Ask a detached (replaced) session to close.
    pub fn kick(player_id: &str, connection: &Connection, reason: &str) {
        if let Err(e) = connection.closer.try_send(CloseSession { reason: reason.to_string() }) {
            warn!("[Dispatcher] Could not close session of {}: {}", player_id, e);
        }
    }

    pub fn deliver(&self, dispatches: Vec<Dispatch>) {
        for dispatch in dispatches {
            match dispatch {
                Dispatch::All(message) => self.broadcast(&message),
                Dispatch::To(player_id, message) => self.send_to(&player_id, message),
            }
        }
    }

    fn push(player_id: &str, connection: &Connection, message: ServerMessage) {
        if let Err(e) = connection.outbox.try_send(message) {
            warn!("[Dispatcher] Skipping session of {}: {}", player_id, e);
        }
    }
}
