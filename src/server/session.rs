//! WebSocket session handler for one player connection.
//!
//! Registers itself with the game server on start, forwards parsed client
//! frames to it, and writes every server message it receives back to the socket.
use actix::prelude::*;
use actix_web::{http::StatusCode, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, error, warn};
use uuid::Uuid;

use super::game_server::{ClientEnvelope, Connect, Disconnect, GameServer};
use super::messages::{ClientMessage, CloseSession, ServerMessage};
use super::ws_error::{http_error_response, internal_close, policy_close};
use crate::game::types::PlayerId;

/// Name of the cookie carrying the player identity.
pub const PLAYER_COOKIE: &str = "player_id";

pub struct GameSessionActor {
    pub player_id: PlayerId,
    /// Distinguishes this connection from a later one with the same cookie.
    pub session_id: Uuid,
    pub server: Addr<GameServer>,
}

impl Actor for GameSessionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let addr = ctx.address();
        self.server.do_send(Connect {
            player_id: self.player_id.clone(),
            session_id: self.session_id,
            outbox: addr.clone().recipient(),
            closer: addr.recipient(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.server.do_send(Disconnect {
            player_id: self.player_id.clone(),
            session_id: self.session_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSessionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(message) => self.server.do_send(ClientEnvelope {
                    player_id: self.player_id.clone(),
                    session_id: self.session_id,
                    message,
                }),
                Err(e) => warn!("[Session] Malformed frame from {}: {}", self.player_id, e),
            },
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                debug!("[Session] {} closed the socket", self.player_id);
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                warn!("[Session] Protocol error from {}: {}", self.player_id, e);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<ServerMessage> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                error!("[Session] Failed to serialize message for {}: {}", self.player_id, e);
                ctx.close(Some(internal_close()));
                ctx.stop();
            }
        }
    }
}

impl Handler<CloseSession> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: CloseSession, ctx: &mut Self::Context) {
        debug!("[Session] Closing session of {}: {}", self.player_id, msg.reason);
        ctx.close(Some(policy_close(&msg.reason)));
        ctx.stop();
    }
}

/// WebSocket endpoint for the game.
///
/// Requires a non-empty `player_id` cookie; requests without one are rejected
/// with 400 before the upgrade.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let player_id = match req.cookie(PLAYER_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => {
            return Ok(http_error_response(
                "MISSING_IDENTITY",
                "A player_id cookie is required",
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    ws::start(
        GameSessionActor {
            player_id,
            session_id: Uuid::new_v4(),
            server: data.game_server.clone(),
        },
        &req,
        stream,
    )
}
