//! Persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the two persisted records live on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the data files
    pub data_dir: PathBuf,
    /// File name of the player mapping
    pub players_file: String,
    /// File name of the game sequence
    pub games_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            players_file: "players.json".to_string(),
            games_file: "games.json".to_string(),
        }
    }
}

impl StorageSettings {
    /// Full path of the player mapping file
    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(&self.players_file)
    }

    /// Full path of the game sequence file
    pub fn games_path(&self) -> PathBuf {
        self.data_dir.join(&self.games_file)
    }
}
