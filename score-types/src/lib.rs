pub mod game;
pub mod palette;
pub mod player;

// Re-export all types
pub use game::*;
pub use palette::*;
pub use player::*;
