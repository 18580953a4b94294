//! Elo rating calculator
//!
//! This module provides a concrete implementation of two-player rating
//! updates using the Elo algorithm from the skillratings crate.

use crate::types::GameResult;
use serde::{Deserialize, Serialize};
use skillratings::elo::{elo, expected_score, EloConfig, EloRating};
use skillratings::Outcomes;

/// Extended configuration for the Elo rating system
///
/// This wraps the skillratings EloConfig with additional parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedEloConfig {
    /// Core Elo parameters (the K-factor)
    pub elo_config: EloConfig,
    /// Initial rating for new players
    pub initial_rating: f64,
}

impl Default for ExtendedEloConfig {
    fn default() -> Self {
        Self {
            elo_config: EloConfig { k: 32.0 },
            initial_rating: 1200.0,
        }
    }
}

impl ExtendedEloConfig {
    /// Create a configuration with an explicit K-factor and initial rating
    pub fn new(k_factor: f64, initial_rating: f64) -> Self {
        Self {
            elo_config: EloConfig { k: k_factor },
            initial_rating,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.elo_config.k.is_finite() || self.elo_config.k <= 0.0 {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "Initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Elo rating calculator
///
/// Stateless apart from its configuration; all inputs are well-formed floats
/// by contract of the callers.
#[derive(Debug, Clone)]
pub struct EloCalculator {
    config: ExtendedEloConfig,
}

impl EloCalculator {
    /// Create a new Elo calculator
    pub fn new(config: ExtendedEloConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    /// Rating assigned to newly registered players
    pub fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    /// The configured K-factor
    pub fn k_factor(&self) -> f64 {
        self.config.elo_config.k
    }

    /// Expected score for a player against an opponent
    ///
    /// `1 / (1 + 10^((rating_b - rating_a) / 400))`, in the open interval
    /// (0, 1). Complementary for the two sides of a pairing.
    pub fn expected_score(&self, rating_a: f64, rating_b: f64) -> f64 {
        let player = EloRating { rating: rating_a };
        let opponent = EloRating { rating: rating_b };

        let (expected, _) = expected_score(&player, &opponent);
        expected
    }

    /// Rating change for a game given expected and actual scores
    pub fn rating_delta(&self, expected: f64, actual: f64) -> f64 {
        self.config.elo_config.k * (actual - expected)
    }

    /// Post-game rating given expected and actual scores
    pub fn new_rating(&self, current: f64, expected: f64, actual: f64) -> f64 {
        current + self.rating_delta(expected, actual)
    }

    /// New ratings `(player_one, player_two)` after a game
    ///
    /// Both sides are updated with the same K-factor, so the two deltas
    /// cancel out.
    pub fn rate_game(&self, rating_one: f64, rating_two: f64, result: GameResult) -> (f64, f64) {
        let player_one = EloRating { rating: rating_one };
        let player_two = EloRating { rating: rating_two };

        let outcome = match result {
            GameResult::WinPlayerOne => Outcomes::WIN,
            GameResult::WinPlayerTwo => Outcomes::LOSS,
            GameResult::Draw => Outcomes::DRAW,
        };

        let (new_one, new_two) = elo(&player_one, &player_two, &outcome, &self.config.elo_config);
        (new_one.rating, new_two.rating)
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self {
            config: ExtendedEloConfig::default(),
        }
    }
}
