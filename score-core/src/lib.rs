pub mod games;
pub mod profiles;
pub mod pulse;
pub mod ranking;
pub mod session;
pub mod text;
pub mod win;

// Re-export main components
pub use games::*;
pub use profiles::*;
pub use pulse::*;
pub use ranking::*;
pub use session::*;
pub use text::*;
pub use win::*;
