//! Error types for botreplay
//!
//! Only bot communication failures are ever swallowed, and only inside
//! the replay send loop. Everything else aborts the operation and is
//! returned to the caller unchanged.

use thiserror::Error;

use crate::driver::DriverError;
use crate::storage::StorageError;

/// Result type alias for core operations
pub type BotReplayResult<T> = Result<T, BotReplayError>;

/// Main error type for core operations
#[derive(Debug, Error)]
pub enum BotReplayError {
    /// Unknown scenario, replay or version; raised before any side effect
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The bot could not be reached or did not answer in time
    #[error("Bot unavailable: {0}")]
    BotUnavailable(String),

    /// The bot key does not resolve to a bot
    #[error("Invalid bot key: {0}")]
    InvalidBotKey(String),

    /// Repository failure, propagated as is
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BotReplayError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        BotReplayError::InvalidArgument(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        BotReplayError::Config(message.into())
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BotReplayError::InvalidArgument(_) => "invalid_argument",
            BotReplayError::BotUnavailable(_) => "bot_unavailable",
            BotReplayError::InvalidBotKey(_) => "invalid_bot_key",
            BotReplayError::Persistence(_) => "persistence_failure",
            BotReplayError::Config(_) => "config",
        }
    }
}

impl From<DriverError> for BotReplayError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::BotUnavailable(msg) => BotReplayError::BotUnavailable(msg),
            DriverError::InvalidBotKey(key) => BotReplayError::InvalidBotKey(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BotReplayError::invalid_argument("scenario 9").error_code(),
            "invalid_argument"
        );
        let err: BotReplayError = StorageError::NotFound("x".into()).into();
        assert_eq!(err.error_code(), "persistence_failure");
        let err: BotReplayError = DriverError::InvalidBotKey("nope".into()).into();
        assert!(matches!(err, BotReplayError::InvalidBotKey(ref k) if k == "nope"));
    }
}
