/// Main configuration module.
///
/// Re-exports submodules for game rules and network configuration.
pub mod game;
pub mod server;
