//! Game server actor.
//!
//! Single owner of the game state and of the connection table. Every inbound
//! intent, every connect/disconnect and every bomb fuse runs as a handler on
//! this actor, so state is never mutated concurrently.

use std::time::Instant;

use actix::prelude::*;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::game::GameSettings;
use crate::game::error::GameError;
use crate::game::state::GameState;
use crate::game::types::{BombId, PlayerId};
use crate::server::broadcast::{Connection, Dispatcher};
use crate::server::chat::relay_message;
use crate::server::messages::{ChatPayload, ClientMessage, CloseSession, Dispatch, ServerMessage};

/// A session opened for `player_id`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub player_id: PlayerId,
    pub session_id: Uuid,
    pub outbox: Recipient<ServerMessage>,
    pub closer: Recipient<CloseSession>,
}

/// A session closed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub player_id: PlayerId,
    pub session_id: Uuid,
}

/// A parsed client frame together with the identity of the connection it came from.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientEnvelope {
    pub player_id: PlayerId,
    pub session_id: Uuid,
    pub message: ClientMessage,
}

pub struct GameServer {
    state: GameState,
    dispatcher: Dispatcher,
}

impl Actor for GameServer {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "[GameServer] Started with a {}x{} grid",
            self.state.grid.width(),
            self.state.grid.height()
        );
    }
}

/// The `id` a client claims must be the identity its connection was opened with.
fn verify_identity(claimed: &str, connection: &str) -> Result<(), GameError> {
    if claimed == connection {
        Ok(())
    } else {
        Err(GameError::UnknownPlayer(claimed.to_string()))
    }
}

impl GameServer {
    pub fn new(settings: GameSettings) -> Self {
        Self::with_state(GameState::new(settings))
    }

    pub fn with_state(state: GameState) -> Self {
        Self { state, dispatcher: Dispatcher::new() }
    }

    /// Arm the fuse of a freshly placed bomb. Fuses are never cancelled; the
    /// callback resolves the bomb id against whatever the state holds then.
    fn schedule_detonation(&self, bomb_id: BombId, ctx: &mut Context<Self>) {
        ctx.run_later(self.state.settings.bomb_fuse, move |act, _ctx| {
            let dispatches = act.state.detonate(bomb_id);
            act.dispatcher.deliver(dispatches);
        });
    }

    fn report_error(&self, player_id: &str, error: GameError) {
        if error.closes_connection() {
            info!("[GameServer] Closing session of {}: {}", player_id, error);
            self.dispatcher.close(player_id, &error.to_string());
        } else if error.is_user_visible() {
            debug!("[GameServer] Rejected request from {}: {}", player_id, error);
            self.dispatcher.send_to(player_id, ServerMessage::error(&error.to_string()));
        } else {
            debug!("[GameServer] Ignored request from {}: {}", player_id, error);
        }
    }

    fn relay_chat(&mut self, player_id: &str, payload: ChatPayload) -> Result<Vec<Dispatch>, GameError> {
        verify_identity(&payload.id, player_id)?;
        let from = self
            .state
            .player(player_id)
            .map(|p| p.username.clone())
            .ok_or_else(|| GameError::UnknownPlayer(player_id.to_string()))?;

        self.dispatcher.set_room(player_id, &payload.room);
        match relay_message(&payload, &from) {
            Some(message) => self.dispatcher.broadcast_room(&payload.room, &message),
            None => debug!("[GameServer] Empty chat message from {} dropped", player_id),
        }
        Ok(Vec::new())
    }

    fn handle_client(
        &mut self,
        player_id: &str,
        message: ClientMessage,
        ctx: &mut Context<Self>,
    ) -> Result<Vec<Dispatch>, GameError> {
        match message {
            ClientMessage::NewUser { id, name } => {
                verify_identity(&id, player_id)?;
                self.state.join(player_id, &name)
            }
            ClientMessage::StartGame { id } => {
                verify_identity(&id, player_id)?;
                self.state.start(player_id)
            }
            ClientMessage::RequestMap => Ok(vec![Dispatch::To(player_id.to_string(), self.state.map_data())]),
            ClientMessage::PlayerMove { id, x, y } => {
                verify_identity(&id, player_id)?;
                self.state.move_player(player_id, x, y, Instant::now())
            }
            ClientMessage::Bomb { id, x, y } => {
                verify_identity(&id, player_id)?;
                let (bomb_id, dispatches) = self.state.place_bomb(player_id, x, y)?;
                self.schedule_detonation(bomb_id, ctx);
                Ok(dispatches)
            }
            ClientMessage::PickupPowerup { id, powerup_id } => {
                verify_identity(&id, player_id)?;
                self.state.pickup(player_id, powerup_id)
            }
            ClientMessage::Respawn { id } => {
                verify_identity(&id, player_id)?;
                self.state.respawn(player_id)
            }
            ClientMessage::ChatMessage { payload } => self.relay_chat(player_id, payload),
            ClientMessage::CheckJoin => Ok(vec![Dispatch::To(player_id.to_string(), self.state.check_join(player_id))]),
        }
    }
}

impl Handler<Connect> for GameServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) -> Self::Result {
        let connection = Connection::new(msg.session_id, msg.outbox, msg.closer);
        if let Some(previous) = self.dispatcher.attach(&msg.player_id, connection) {
            Dispatcher::kick(&msg.player_id, &previous, "Another session has connected with your id.");
            debug!("[GameServer] Player {} reconnected (old session kicked)", msg.player_id);
        }
        debug!("[GameServer] Session {} attached for {} ({} open)", msg.session_id, msg.player_id, self.dispatcher.len());
    }
}

impl Handler<Disconnect> for GameServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _ctx: &mut Self::Context) -> Self::Result {
        if !self.dispatcher.detach(&msg.player_id, msg.session_id) {
            debug!("[GameServer] Stale disconnect of {} ignored", msg.player_id);
            return;
        }
        let dispatches = self.state.leave(&msg.player_id);
        self.dispatcher.deliver(dispatches);
    }
}

impl Handler<ClientEnvelope> for GameServer {
    type Result = ();

    fn handle(&mut self, msg: ClientEnvelope, ctx: &mut Self::Context) -> Self::Result {
        if !self.dispatcher.is_current(&msg.player_id, msg.session_id) {
            warn!("[GameServer] Message from replaced session of {} dropped", msg.player_id);
            return;
        }
        match self.handle_client(&msg.player_id, msg.message, ctx) {
            Ok(dispatches) => self.dispatcher.deliver(dispatches),
            Err(error) => self.report_error(&msg.player_id, error),
        }
    }
}
