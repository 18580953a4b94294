//! Rating system integration using the Elo algorithm
//!
//! This module provides rating calculations and configuration, built on the
//! elo module of the skillratings crate.

pub mod elo;

// Re-export commonly used types
pub use elo::{EloCalculator, ExtendedEloConfig};
