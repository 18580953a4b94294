//! Rating engine: the transactional core of the ledger
//!
//! Applies game results to the player store and game log as a single
//! all-or-nothing step, persisting write-through before any mutation becomes
//! visible to callers.

use crate::error::{RatingError, Result};
use crate::query::{self, AggregateStats};
use crate::rating::EloCalculator;
use crate::storage::Storage;
use crate::store::{GameLog, PlayerStore};
use crate::types::{GameOutcomeReport, GameRecord, GameResult, Player};
use chrono::{NaiveDate, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info};

/// The engine-owned mutable state, guarded by a single lock
#[derive(Debug)]
struct LedgerState {
    players: PlayerStore,
    games: GameLog,
}

/// Orchestrates rating math, the player store and the game log
///
/// Each mutating call runs under an exclusive critical section covering the
/// whole read-compute-write-persist transaction, so concurrent submissions
/// cannot interleave their read and write phases. Read-only queries take a
/// shared lock and return owned snapshots. Games are applied strictly in
/// submission order; the order is an input, not a derived property.
pub struct RatingEngine {
    state: RwLock<LedgerState>,
    storage: Arc<dyn Storage>,
    calculator: EloCalculator,
}

impl RatingEngine {
    /// Create an engine over a persistence collaborator
    ///
    /// Loads both persisted records; missing files mean an empty ledger.
    pub fn new(calculator: EloCalculator, storage: Arc<dyn Storage>) -> Result<Self> {
        let players = PlayerStore::from_records(storage.load_players()?);
        let games = GameLog::from_records(storage.load_games()?);
        info!(
            players = players.len(),
            games = games.len(),
            "loaded rating ledger"
        );

        Ok(Self {
            state: RwLock::new(LedgerState { players, games }),
            storage,
            calculator,
        })
    }

    /// Rating assigned to players registered without an explicit rating
    pub fn default_initial_rating(&self) -> f64 {
        self.calculator.initial_rating()
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>> {
        self.state.read().map_err(|_| lock_poisoned().into())
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>> {
        self.state.write().map_err(|_| lock_poisoned().into())
    }

    /// Register a new player
    ///
    /// `initial_rating` falls back to the configured default. The updated
    /// player mapping is persisted before the registration becomes visible.
    pub fn register_player(&self, name: &str, initial_rating: Option<f64>) -> Result<Player> {
        let mut state = self.write_state()?;

        let rating = initial_rating.unwrap_or_else(|| self.calculator.initial_rating());
        let date_added = Utc::now().date_naive();

        // Stage the registration on a copy so a failed persist leaves the
        // live store untouched.
        let mut staged = state.players.clone();
        staged.register(name, rating, date_added)?;

        self.storage.save_players(&staged.snapshot())?;
        state.players = staged;

        info!(name, rating, "registered player");
        Ok(state.players.get(name)?.clone())
    }

    /// Record a finished game between two registered players
    ///
    /// Validates first (no partial state on error), computes both new
    /// ratings, updates both player records, appends the audit record and
    /// persists everything before committing. On a storage failure the
    /// in-memory state is unchanged and prior durable state is restored.
    pub fn record_game(
        &self,
        player1: &str,
        player2: &str,
        result: GameResult,
        date: NaiveDate,
    ) -> Result<GameOutcomeReport> {
        let mut state = self.write_state()?;

        if player1 == player2 {
            return Err(RatingError::SamePlayer {
                name: player1.to_string(),
            }
            .into());
        }
        let old_rating_1 = state.players.get(player1)?.rating;
        let old_rating_2 = state.players.get(player2)?.rating;

        let (new_rating_1, new_rating_2) =
            self.calculator
                .rate_game(old_rating_1, old_rating_2, result);

        let record = GameRecord {
            player1: player1.to_string(),
            player2: player2.to_string(),
            result,
            date,
            player1_old_rating: old_rating_1,
            player2_old_rating: old_rating_2,
            player1_new_rating: new_rating_1,
            player2_new_rating: new_rating_2,
            rating_change_1: new_rating_1 - old_rating_1,
            rating_change_2: new_rating_2 - old_rating_2,
        };

        // Stage both player updates and the appended record off to the side.
        let (outcome_1, outcome_2) = result.outcomes();
        let mut staged_players = state.players.clone();
        staged_players.update(player1, new_rating_1, outcome_1)?;
        staged_players.update(player2, new_rating_2, outcome_2)?;

        let mut staged_games = state.games.all().to_vec();
        staged_games.push(record.clone());

        // Write-through persist of both records. If the second save fails,
        // restore the first so durable state stays consistent.
        self.storage.save_players(&staged_players.snapshot())?;
        if let Err(save_err) = self.storage.save_games(&staged_games) {
            if let Err(restore_err) = self.storage.save_players(&state.players.snapshot()) {
                error!(
                    error = %restore_err,
                    "failed to restore player record after game save failure"
                );
            }
            return Err(save_err);
        }

        // Persisted on both sides; commit to the live state.
        state.players = staged_players;
        state.games.append(record.clone());

        info!(
            player1,
            player2,
            result = %result,
            delta = record.rating_change_1,
            "recorded game"
        );
        Ok(GameOutcomeReport::from_record(&record))
    }

    /// All registered players in registration order
    pub fn list_players(&self) -> Result<Vec<Player>> {
        let state = self.read_state()?;
        Ok(state.players.list().cloned().collect())
    }

    /// The full game log in append order
    pub fn all_games(&self) -> Result<Vec<GameRecord>> {
        let state = self.read_state()?;
        Ok(state.games.all().to_vec())
    }

    /// Players sorted by rating descending
    pub fn leaderboard(&self) -> Result<Vec<Player>> {
        let state = self.read_state()?;
        Ok(query::leaderboard(&state.players))
    }

    /// The latest games, newest first
    pub fn recent_games(&self, limit: usize) -> Result<Vec<GameRecord>> {
        let state = self.read_state()?;
        Ok(query::recent_games(&state.games, limit))
    }

    /// A player's chronological rating trajectory
    pub fn rating_trajectory(&self, name: &str) -> Result<Vec<(NaiveDate, f64)>> {
        let state = self.read_state()?;
        Ok(query::rating_trajectory(&state.games, name))
    }

    /// Aggregate statistics over the whole ledger
    pub fn aggregate_stats(&self) -> Result<AggregateStats> {
        let state = self.read_state()?;
        Ok(query::aggregate_stats(&state.players, &state.games))
    }
}

fn lock_poisoned() -> RatingError {
    RatingError::StorageFailure {
        message: "ledger state lock poisoned".to_string(),
    }
}
