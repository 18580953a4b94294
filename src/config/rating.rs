//! Rating system configuration

use serde::{Deserialize, Serialize};

/// Elo parameters for the rating engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    /// K-factor applied to every rating update
    pub k_factor: f64,
    /// Rating assigned to players registered without an explicit rating
    pub initial_rating: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            initial_rating: 1200.0,
        }
    }
}
