//! Game entities module.
//!
//! This module organizes player, bomb and powerup entity logic.

pub mod player;
pub mod bomb;
pub mod powerup;

pub use player::*;
pub use bomb::*;
pub use powerup::*;
