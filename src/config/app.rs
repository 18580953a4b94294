//! Main application configuration
//!
//! This module defines the primary configuration structure for the rating
//! ledger, including environment variable loading, TOML file loading and
//! validation.

use crate::config::rating::RatingSettings;
use crate::config::storage::StorageSettings;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingSettings,
    pub storage: StorageSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "rating-ledger".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(k_factor) = env::var("K_FACTOR") {
            config.rating.k_factor = k_factor
                .parse()
                .map_err(|_| anyhow!("Invalid K_FACTOR value: {}", k_factor))?;
        }
        if let Ok(initial) = env::var("INITIAL_RATING") {
            config.rating.initial_rating = initial
                .parse()
                .map_err(|_| anyhow!("Invalid INITIAL_RATING value: {}", initial))?;
        }

        // Storage settings
        if let Ok(data_dir) = env::var("DATA_DIR") {
            config.storage.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(players_file) = env::var("PLAYERS_FILE") {
            config.storage.players_file = players_file;
        }
        if let Ok(games_file) = env::var("GAMES_FILE") {
            config.storage.games_file = games_file;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate rating settings
    if !config.rating.k_factor.is_finite() || config.rating.k_factor <= 0.0 {
        return Err(anyhow!("K-factor must be positive"));
    }
    if !config.rating.initial_rating.is_finite() {
        return Err(anyhow!("Initial rating must be finite"));
    }

    // Validate storage settings
    if config.storage.players_file.is_empty() {
        return Err(anyhow!("Players file name cannot be empty"));
    }
    if config.storage.games_file.is_empty() {
        return Err(anyhow!("Games file name cannot be empty"));
    }
    if config.storage.players_file == config.storage.games_file {
        return Err(anyhow!(
            "Players and games records cannot share a file: {}",
            config.storage.players_file
        ));
    }

    Ok(())
}
