//! HTTP and WebSocket routing configuration.

use actix_web::web;
use crate::server::session::ws_game;

/// Configure the application's routes.
///
/// `/ws` upgrades to a game session; identity comes from the `player_id` cookie.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ws")
            .to(ws_game)
    );
}
