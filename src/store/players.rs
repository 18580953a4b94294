//! Player record storage
//!
//! An insertion-ordered in-memory map of player records. The rating engine
//! is the single writer; readers get snapshot semantics through the engine's
//! locking discipline.

use crate::error::RatingError;
use crate::types::{Player, PlayerName, PlayerOutcome};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Persisted form of a player record
///
/// The name is the key of the surrounding mapping rather than a field,
/// mirroring the on-disk layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlayer {
    pub rating: f64,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub date_added: NaiveDate,
}

impl From<&Player> for StoredPlayer {
    fn from(player: &Player) -> Self {
        Self {
            rating: player.rating,
            games_played: player.games_played,
            wins: player.wins,
            losses: player.losses,
            draws: player.draws,
            date_added: player.date_added,
        }
    }
}

/// In-memory store of registered players
///
/// Iteration follows registration order, which also provides the
/// first-in-store tie-breaking used by the query layer.
#[derive(Debug, Clone, Default)]
pub struct PlayerStore {
    players: HashMap<PlayerName, Player>,
    order: Vec<PlayerName>,
}

impl PlayerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from its persisted mapping
    pub fn from_records(records: BTreeMap<PlayerName, StoredPlayer>) -> Self {
        let mut store = Self::new();
        for (name, record) in records {
            store.order.push(name.clone());
            store.players.insert(
                name.clone(),
                Player {
                    name,
                    rating: record.rating,
                    games_played: record.games_played,
                    wins: record.wins,
                    losses: record.losses,
                    draws: record.draws,
                    date_added: record.date_added,
                },
            );
        }
        store
    }

    /// The persisted mapping for this store, with deterministic key order
    pub fn snapshot(&self) -> BTreeMap<PlayerName, StoredPlayer> {
        self.players
            .iter()
            .map(|(name, player)| (name.clone(), StoredPlayer::from(player)))
            .collect()
    }

    /// Register a new player with zeroed counters
    pub fn register(
        &mut self,
        name: &str,
        rating: f64,
        date_added: NaiveDate,
    ) -> Result<&Player, RatingError> {
        if name.trim().is_empty() {
            return Err(RatingError::InvalidName {
                reason: "name must not be empty".to_string(),
            });
        }
        if self.players.contains_key(name) {
            return Err(RatingError::DuplicatePlayer {
                name: name.to_string(),
            });
        }

        let player = Player::new(name.to_string(), rating, date_added);
        self.order.push(name.to_string());
        self.players.insert(name.to_string(), player);
        Ok(&self.players[name])
    }

    /// Look up a player by name
    pub fn get(&self, name: &str) -> Result<&Player, RatingError> {
        self.players.get(name).ok_or_else(|| RatingError::PlayerNotFound {
            name: name.to_string(),
        })
    }

    /// Whether a player with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    /// Apply a game outcome to a player: new rating plus counter update
    pub fn update(
        &mut self,
        name: &str,
        new_rating: f64,
        outcome: PlayerOutcome,
    ) -> Result<(), RatingError> {
        let player = self
            .players
            .get_mut(name)
            .ok_or_else(|| RatingError::PlayerNotFound {
                name: name.to_string(),
            })?;
        player.apply_game(new_rating, outcome);
        Ok(())
    }

    /// All players in registration order
    pub fn list(&self) -> impl Iterator<Item = &Player> {
        self.order.iter().filter_map(|name| self.players.get(name))
    }

    /// Number of registered players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no players are registered
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
