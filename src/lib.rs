pub mod core {
	pub mod engine;
	pub mod game;
	pub mod launch;
	pub mod offer_wall;
	pub mod session;
	pub mod timer;
	pub mod verify;
}

pub mod cli;
pub mod games;
pub mod logging;

// Re-export for convenience
pub use crate::core::game::{Command, Context, Game};
pub use crate::core::session::GameSession;
pub use crate::games::GameConfig;
