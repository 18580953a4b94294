//! Owned in-memory state: player records and the game log
//!
//! Both stores are plain data structures; locking and persistence are the
//! engine's responsibility.

pub mod games;
pub mod players;

// Re-export commonly used types
pub use games::GameLog;
pub use players::{PlayerStore, StoredPlayer};
