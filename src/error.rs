//! Error types for udp2docker.

use thiserror::Error;

/// Main error type for all server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value from the environment.
    #[error("Config error: {0}")]
    Config(String),

    /// Protocol error (oversized payload, malformed message).
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result type alias using ServerError.
pub type Result<T> = std::result::Result<T, ServerError>;
