//! Map storage and the map generator.

pub mod grid;

pub use grid::*;
