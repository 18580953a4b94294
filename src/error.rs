//! Error types for the rating ledger
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating-ledger scenarios
///
/// Every variant is recoverable at the caller boundary. Validation errors
/// are raised before any state mutation occurs.
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Player already exists: {name}")]
    DuplicatePlayer { name: String },

    #[error("Invalid player name: {reason}")]
    InvalidName { reason: String },

    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },

    #[error("A game requires two distinct players: {name}")]
    SamePlayer { name: String },

    #[error("Unrecognized game result: {token}")]
    InvalidResult { token: String },

    #[error("Storage operation failed: {message}")]
    StorageFailure { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
