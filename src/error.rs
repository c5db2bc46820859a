//! Error types for the onboarding flow engine.
//!
//! The core state machine never fails: navigation clamps and the metrics
//! calculator falls back to defaults. Errors only surface at parse and I/O
//! boundaries (variant ids, user-data keys, REPL commands, config).

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown flow variant: {0}")]
    UnknownVariant(String),

    #[error("Unknown user data field: {0}")]
    UnknownField(String),

    #[error("Invalid value {value:?} for field {key}: {reason}")]
    InvalidFieldValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Persistence errors from a variant storage backend.
///
/// Kept separate from [`Error`]: the A/B store logs these and carries on.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
