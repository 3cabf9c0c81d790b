//! Main entry point for the bomb arena server.
//!
//! Initializes logging and the game server actor, then launches the HTTP server
//! with the game WebSocket endpoint.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;

use config::game::GameSettings;
use config::server::ServerConfig;
use server::game_server::GameServer;

pub mod config;
mod server;
mod game;


#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Logger defaults to info level, RUST_LOG overrides.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = ServerConfig::from_env();

    // Single owner of the game state.
    let game_server = GameServer::new(GameSettings::default()).start();

    let state = web::Data::new(server::state::AppState::new(game_server));

    info!("[Main] Listening on {}:{}", server_config.host, server_config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await
}
