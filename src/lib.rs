//! Rating Ledger - Elo ratings for pairwise game results
//!
//! This crate maintains skill ratings for a pool of players from recorded
//! game outcomes, with durable JSON persistence, an append-only game log
//! and read-only leaderboard/history/statistics views.

pub mod config;
pub mod engine;
pub mod error;
pub mod query;
pub mod rating;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use engine::RatingEngine;
pub use rating::{EloCalculator, ExtendedEloConfig};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
