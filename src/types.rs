//! Common types used throughout the rating ledger

use crate::error::RatingError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for players
///
/// Names are case-sensitive and stored verbatim.
pub type PlayerName = String;

/// Result of a recorded game, from player one's side of the board
///
/// External input uses the score tokens `1-0`, `0-1` and `1/2-1/2`; they are
/// parsed into this closed enumeration exactly once at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WinPlayerOne,
    #[serde(rename = "0-1")]
    WinPlayerTwo,
    #[serde(rename = "1/2-1/2")]
    Draw,
}

impl GameResult {
    /// Actual scores `(player_one, player_two)` fed into the rating update
    pub fn scores(&self) -> (f64, f64) {
        match self {
            GameResult::WinPlayerOne => (1.0, 0.0),
            GameResult::WinPlayerTwo => (0.0, 1.0),
            GameResult::Draw => (0.5, 0.5),
        }
    }

    /// Per-side outcomes `(player_one, player_two)` for counter bookkeeping
    pub fn outcomes(&self) -> (PlayerOutcome, PlayerOutcome) {
        match self {
            GameResult::WinPlayerOne => (PlayerOutcome::Win, PlayerOutcome::Loss),
            GameResult::WinPlayerTwo => (PlayerOutcome::Loss, PlayerOutcome::Win),
            GameResult::Draw => (PlayerOutcome::Draw, PlayerOutcome::Draw),
        }
    }

    /// The score token used for storage and display
    pub fn token(&self) -> &'static str {
        match self {
            GameResult::WinPlayerOne => "1-0",
            GameResult::WinPlayerTwo => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for GameResult {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1-0" => Ok(GameResult::WinPlayerOne),
            "0-1" => Ok(GameResult::WinPlayerTwo),
            "1/2-1/2" => Ok(GameResult::Draw),
            other => Err(RatingError::InvalidResult {
                token: other.to_string(),
            }),
        }
    }
}

/// How a single game went for one of its two participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerOutcome {
    Win,
    Loss,
    Draw,
}

/// A registered player and their accumulated record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerName,
    pub rating: f64,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub date_added: NaiveDate,
}

impl Player {
    /// Create a new player with zeroed counters
    pub fn new(name: PlayerName, rating: f64, date_added: NaiveDate) -> Self {
        Self {
            name,
            rating,
            games_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            date_added,
        }
    }

    /// Apply a finished game: new rating plus exactly one counter increment
    pub fn apply_game(&mut self, new_rating: f64, outcome: PlayerOutcome) {
        self.rating = new_rating;
        self.games_played += 1;
        match outcome {
            PlayerOutcome::Win => self.wins += 1,
            PlayerOutcome::Loss => self.losses += 1,
            PlayerOutcome::Draw => self.draws += 1,
        }
    }

    /// Fraction of games won, 0.0 for players with no games
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.games_played)
        }
    }
}

/// One immutable entry in the game log
///
/// Ratings immediately before and after the game are captured at write time.
/// They are the audit trail for historical queries and are never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player1: PlayerName,
    pub player2: PlayerName,
    pub result: GameResult,
    pub date: NaiveDate,
    pub player1_old_rating: f64,
    pub player2_old_rating: f64,
    pub player1_new_rating: f64,
    pub player2_new_rating: f64,
    pub rating_change_1: f64,
    pub rating_change_2: f64,
}

impl GameRecord {
    /// Whether the given player took part in this game
    pub fn involves(&self, name: &str) -> bool {
        self.player1 == name || self.player2 == name
    }

    /// The post-game rating of the given player, if they took part
    pub fn new_rating_for(&self, name: &str) -> Option<f64> {
        if self.player1 == name {
            Some(self.player1_new_rating)
        } else if self.player2 == name {
            Some(self.player2_new_rating)
        } else {
            None
        }
    }
}

/// Rating change information for a single player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub name: PlayerName,
    pub old_rating: f64,
    pub new_rating: f64,
    pub delta: f64,
}

/// Report returned to the caller after a game has been recorded
///
/// Mirrors the stored [`GameRecord`] for the game it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOutcomeReport {
    pub result: GameResult,
    pub date: NaiveDate,
    pub player_one: RatingChange,
    pub player_two: RatingChange,
}

impl GameOutcomeReport {
    /// Build the caller-facing report from a freshly appended record
    pub fn from_record(record: &GameRecord) -> Self {
        Self {
            result: record.result,
            date: record.date,
            player_one: RatingChange {
                name: record.player1.clone(),
                old_rating: record.player1_old_rating,
                new_rating: record.player1_new_rating,
                delta: record.rating_change_1,
            },
            player_two: RatingChange {
                name: record.player2.clone(),
                old_rating: record.player2_old_rating,
                new_rating: record.player2_new_rating,
                delta: record.rating_change_2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_result_tokens_round_trip() {
        for token in ["1-0", "0-1", "1/2-1/2"] {
            let result: GameResult = token.parse().unwrap();
            assert_eq!(result.to_string(), token);
        }
    }

    #[test]
    fn test_unknown_result_token_rejected() {
        let err = "2-0".parse::<GameResult>().unwrap_err();
        assert!(matches!(err, RatingError::InvalidResult { token } if token == "2-0"));
    }

    #[test]
    fn test_result_scores_sum_to_one() {
        for result in [
            GameResult::WinPlayerOne,
            GameResult::WinPlayerTwo,
            GameResult::Draw,
        ] {
            let (s1, s2) = result.scores();
            assert_eq!(s1 + s2, 1.0);
        }
    }

    #[test]
    fn test_result_serde_uses_score_tokens() {
        let json = serde_json::to_string(&GameResult::Draw).unwrap();
        assert_eq!(json, "\"1/2-1/2\"");
        let parsed: GameResult = serde_json::from_str("\"1-0\"").unwrap();
        assert_eq!(parsed, GameResult::WinPlayerOne);
    }

    #[test]
    fn test_apply_game_updates_exactly_one_counter() {
        let mut player = Player::new("Alice".to_string(), 1200.0, date("2024-03-01"));

        player.apply_game(1216.0, PlayerOutcome::Win);
        assert_eq!(player.rating, 1216.0);
        assert_eq!((player.wins, player.losses, player.draws), (1, 0, 0));

        player.apply_game(1210.0, PlayerOutcome::Draw);
        player.apply_game(1195.0, PlayerOutcome::Loss);
        assert_eq!(player.games_played, 3);
        assert_eq!(
            player.games_played,
            player.wins + player.losses + player.draws
        );
    }

    #[test]
    fn test_win_rate() {
        let mut player = Player::new("Bob".to_string(), 1200.0, date("2024-03-01"));
        assert_eq!(player.win_rate(), 0.0);

        player.apply_game(1216.0, PlayerOutcome::Win);
        player.apply_game(1200.0, PlayerOutcome::Loss);
        assert_eq!(player.win_rate(), 0.5);
    }

    #[test]
    fn test_report_mirrors_record() {
        let record = GameRecord {
            player1: "Alice".to_string(),
            player2: "Bob".to_string(),
            result: GameResult::WinPlayerOne,
            date: date("2024-03-05"),
            player1_old_rating: 1400.0,
            player2_old_rating: 1300.0,
            player1_new_rating: 1411.52,
            player2_new_rating: 1288.48,
            rating_change_1: 11.52,
            rating_change_2: -11.52,
        };

        let report = GameOutcomeReport::from_record(&record);
        assert_eq!(report.player_one.name, "Alice");
        assert_eq!(report.player_one.delta, 11.52);
        assert_eq!(report.player_two.old_rating, 1300.0);
        assert_eq!(report.player_two.new_rating, 1288.48);
        assert_eq!(report.result, GameResult::WinPlayerOne);
    }

    #[test]
    fn test_record_lookup_helpers() {
        let record = GameRecord {
            player1: "Alice".to_string(),
            player2: "Bob".to_string(),
            result: GameResult::Draw,
            date: date("2024-03-05"),
            player1_old_rating: 1200.0,
            player2_old_rating: 1200.0,
            player1_new_rating: 1200.0,
            player2_new_rating: 1200.0,
            rating_change_1: 0.0,
            rating_change_2: 0.0,
        };

        assert!(record.involves("Alice"));
        assert!(!record.involves("Carol"));
        assert_eq!(record.new_rating_for("Bob"), Some(1200.0));
        assert_eq!(record.new_rating_for("Carol"), None);
    }
}
