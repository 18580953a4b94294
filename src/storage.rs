//! Persistence collaborator interface and implementations
//!
//! This module defines the interface for durably storing the player mapping
//! and the game log, with a JSON-file implementation and an in-memory
//! implementation for tests and benchmarks.

use crate::error::{RatingError, Result};
use crate::store::players::StoredPlayer;
use crate::types::{GameRecord, PlayerName};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::debug;

/// Trait for persistence operations
///
/// The two records are independent; the engine composes them into an
/// all-or-nothing transaction. Every operation can fail with
/// [`RatingError::StorageFailure`].
pub trait Storage: Send + Sync {
    /// Load the persisted player mapping
    fn load_players(&self) -> Result<BTreeMap<PlayerName, StoredPlayer>>;

    /// Durably store the player mapping
    fn save_players(&self, players: &BTreeMap<PlayerName, StoredPlayer>) -> Result<()>;

    /// Load the persisted game sequence
    fn load_games(&self) -> Result<Vec<GameRecord>>;

    /// Durably store the game sequence
    fn save_games(&self, games: &[GameRecord]) -> Result<()>;
}

/// JSON-file persistence
///
/// Players and games live in two JSON files. Saves write a temporary file in
/// the same directory and rename it over the target, so a crash mid-write
/// never leaves a torn file behind.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    players_path: PathBuf,
    games_path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage collaborator over the two given file paths
    pub fn new(players_path: impl Into<PathBuf>, games_path: impl Into<PathBuf>) -> Self {
        Self {
            players_path: players_path.into(),
            games_path: games_path.into(),
        }
    }

    fn read_json<T>(path: &Path) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        // A missing file means an empty ledger, not an error.
        if !path.exists() {
            return Ok(T::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| RatingError::StorageFailure {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        serde_json::from_str(&contents)
            .map_err(|e| {
                RatingError::StorageFailure {
                    message: format!("failed to parse {}: {}", path.display(), e),
                }
                .into()
            })
    }

    fn write_json<T>(path: &Path, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let serialized =
            serde_json::to_string_pretty(value).map_err(|e| RatingError::StorageFailure {
                message: format!("failed to serialize {}: {}", path.display(), e),
            })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| RatingError::StorageFailure {
                    message: format!("failed to create {}: {}", parent.display(), e),
                })?;
            }
        }

        // Write-then-rename keeps the previous contents intact on failure.
        let mut tmp_path = path.as_os_str().to_owned();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, serialized).map_err(|e| RatingError::StorageFailure {
            message: format!("failed to write {}: {}", tmp_path.display(), e),
        })?;
        fs::rename(&tmp_path, path).map_err(|e| RatingError::StorageFailure {
            message: format!("failed to replace {}: {}", path.display(), e),
        })?;

        debug!(path = %path.display(), "persisted record");
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load_players(&self) -> Result<BTreeMap<PlayerName, StoredPlayer>> {
        Self::read_json(&self.players_path)
    }

    fn save_players(&self, players: &BTreeMap<PlayerName, StoredPlayer>) -> Result<()> {
        Self::write_json(&self.players_path, players)
    }

    fn load_games(&self) -> Result<Vec<GameRecord>> {
        Self::read_json(&self.games_path)
    }

    fn save_games(&self, games: &[GameRecord]) -> Result<()> {
        Self::write_json(&self.games_path, &games)
    }
}

/// In-memory persistence for tests and benchmarks
///
/// Records save calls and supports one-shot failure injection so callers can
/// exercise the engine's rollback path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    players: RwLock<BTreeMap<PlayerName, StoredPlayer>>,
    games: RwLock<Vec<GameRecord>>,
    player_saves: AtomicUsize,
    game_saves: AtomicUsize,
    fail_next_player_save: AtomicBool,
    fail_next_game_save: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset durable state, bypassing the save counters
    pub fn preset(
        &self,
        players: BTreeMap<PlayerName, StoredPlayer>,
        games: Vec<GameRecord>,
    ) -> Result<()> {
        *self.players.write().map_err(|_| lock_failure())? = players;
        *self.games.write().map_err(|_| lock_failure())? = games;
        Ok(())
    }

    /// Durable player mapping as last saved
    pub fn stored_players(&self) -> BTreeMap<PlayerName, StoredPlayer> {
        self.players.read().map(|p| p.clone()).unwrap_or_default()
    }

    /// Durable game sequence as last saved
    pub fn stored_games(&self) -> Vec<GameRecord> {
        self.games.read().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of player-mapping saves observed
    pub fn player_save_count(&self) -> usize {
        self.player_saves.load(Ordering::SeqCst)
    }

    /// Number of game-sequence saves observed
    pub fn game_save_count(&self) -> usize {
        self.game_saves.load(Ordering::SeqCst)
    }

    /// Make the next player save fail with a storage error
    pub fn fail_next_player_save(&self) {
        self.fail_next_player_save.store(true, Ordering::SeqCst);
    }

    /// Make the next game save fail with a storage error
    pub fn fail_next_game_save(&self) {
        self.fail_next_game_save.store(true, Ordering::SeqCst);
    }
}

fn lock_failure() -> RatingError {
    RatingError::StorageFailure {
        message: "failed to acquire storage lock".to_string(),
    }
}

impl Storage for MemoryStorage {
    fn load_players(&self) -> Result<BTreeMap<PlayerName, StoredPlayer>> {
        Ok(self.players.read().map_err(|_| lock_failure())?.clone())
    }

    fn save_players(&self, players: &BTreeMap<PlayerName, StoredPlayer>) -> Result<()> {
        if self.fail_next_player_save.swap(false, Ordering::SeqCst) {
            return Err(RatingError::StorageFailure {
                message: "injected player save failure".to_string(),
            }
            .into());
        }

        self.player_saves.fetch_add(1, Ordering::SeqCst);
        *self.players.write().map_err(|_| lock_failure())? = players.clone();
        Ok(())
    }

    fn load_games(&self) -> Result<Vec<GameRecord>> {
        Ok(self.games.read().map_err(|_| lock_failure())?.clone())
    }

    fn save_games(&self, games: &[GameRecord]) -> Result<()> {
        if self.fail_next_game_save.swap(false, Ordering::SeqCst) {
            return Err(RatingError::StorageFailure {
                message: "injected game save failure".to_string(),
            }
            .into());
        }

        self.game_saves.fetch_add(1, Ordering::SeqCst);
        *self.games.write().map_err(|_| lock_failure())? = games.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameResult;
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicU32;

    static TEST_DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    /// Unique scratch directory per test invocation
    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rating-ledger-test-{}-{}-{}",
            std::process::id(),
            label,
            TEST_DIR_SEQ.fetch_add(1, Ordering::SeqCst),
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn stored_player(rating: f64) -> StoredPlayer {
        StoredPlayer {
            rating,
            games_played: 3,
            wins: 2,
            losses: 1,
            draws: 0,
            date_added: "2024-03-01".parse::<NaiveDate>().unwrap(),
        }
    }

    fn game_record() -> GameRecord {
        GameRecord {
            player1: "Alice".to_string(),
            player2: "Bob".to_string(),
            result: GameResult::WinPlayerOne,
            date: "2024-03-05".parse::<NaiveDate>().unwrap(),
            player1_old_rating: 1200.0,
            player2_old_rating: 1200.0,
            player1_new_rating: 1216.0,
            player2_new_rating: 1184.0,
            rating_change_1: 16.0,
            rating_change_2: -16.0,
        }
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = scratch_dir("missing");
        let storage = JsonFileStorage::new(dir.join("players.json"), dir.join("games.json"));

        assert!(storage.load_players().unwrap().is_empty());
        assert!(storage.load_games().unwrap().is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = scratch_dir("roundtrip");
        let storage = JsonFileStorage::new(dir.join("players.json"), dir.join("games.json"));

        let mut players = BTreeMap::new();
        players.insert("Alice".to_string(), stored_player(1216.0));
        let games = vec![game_record()];

        storage.save_players(&players).unwrap();
        storage.save_games(&games).unwrap();

        assert_eq!(storage.load_players().unwrap(), players);
        assert_eq!(storage.load_games().unwrap(), games);
    }

    #[test]
    fn test_game_record_field_layout() {
        // The on-disk game objects carry the documented field names and the
        // raw score token for the result.
        let json = serde_json::to_value(game_record()).unwrap();
        assert_eq!(json["result"], "1-0");
        assert_eq!(json["player1"], "Alice");
        assert_eq!(json["player1_old_rating"], 1200.0);
        assert_eq!(json["rating_change_2"], -16.0);
        assert_eq!(json["date"], "2024-03-05");
    }

    #[test]
    fn test_malformed_file_is_storage_failure() {
        let dir = scratch_dir("malformed");
        let players_path = dir.join("players.json");
        fs::write(&players_path, "{not json").unwrap();

        let storage = JsonFileStorage::new(players_path, dir.join("games.json"));
        let err = storage.load_players().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::StorageFailure { .. })
        ));
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = scratch_dir("overwrite");
        let storage = JsonFileStorage::new(dir.join("players.json"), dir.join("games.json"));

        let mut players = BTreeMap::new();
        players.insert("Alice".to_string(), stored_player(1200.0));
        storage.save_players(&players).unwrap();

        players.insert("Bob".to_string(), stored_player(1300.0));
        storage.save_players(&players).unwrap();

        let loaded = storage.load_players().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["Bob"].rating, 1300.0);
    }

    #[test]
    fn test_memory_storage_records_saves() {
        let storage = MemoryStorage::new();
        let mut players = BTreeMap::new();
        players.insert("Alice".to_string(), stored_player(1200.0));

        storage.save_players(&players).unwrap();
        storage.save_games(&[game_record()]).unwrap();

        assert_eq!(storage.player_save_count(), 1);
        assert_eq!(storage.game_save_count(), 1);
        assert_eq!(storage.stored_players(), players);
        assert_eq!(storage.stored_games().len(), 1);
    }

    #[test]
    fn test_memory_storage_failure_injection_is_one_shot() {
        let storage = MemoryStorage::new();
        storage.fail_next_game_save();

        let err = storage.save_games(&[game_record()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::StorageFailure { .. })
        ));
        // Durable state untouched by the failed save.
        assert!(storage.stored_games().is_empty());

        // The next save goes through.
        storage.save_games(&[game_record()]).unwrap();
        assert_eq!(storage.stored_games().len(), 1);
    }
}
