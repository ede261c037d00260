//! Error types for signal handling.

use thiserror::Error;

/// Errors that can occur when handling signals.
#[derive(Debug, Error, Clone)]
pub enum EventError {
    /// The signal type is unknown.
    #[error("unknown signal type: {0}")]
    UnknownSignalType(String),

    /// The signal payload is invalid.
    #[error("invalid signal payload: {0}")]
    InvalidPayload(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}
