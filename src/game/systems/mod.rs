pub mod movement;
pub mod spawn;
pub mod explosion;

pub use movement::*;
pub use spawn::*;
pub use explosion::*;
