//! Error types for the caller-side chat wrappers

use thiserror::Error;

/// Errors surfaced to code calling the relay
#[derive(Debug, Error)]
pub enum ClientError {
    /// The buffered call never produced a usable envelope
    #[error("Failed to send message")]
    SendFailed { reason: String },

    /// The relay answered a streamed call with a non-success status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Connection or body read failures
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend reported a failure in its response envelope
    #[error("{0}")]
    Api(String),

    /// A response payload did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
