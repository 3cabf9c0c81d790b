pub mod types;
pub mod error;
pub mod state;

pub mod entities;
pub mod grid;
pub mod registry;
pub mod systems;
