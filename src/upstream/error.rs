//! Error types for calls from the relay to the assistant backend

use thiserror::Error;

/// Errors that can occur when forwarding a request to the backend
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, timeout or body read failures
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("API request failed with status {status}")]
    Status { status: u16, body: String },

    /// The backend body was not the JSON we expected
    #[error("Decode error: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Status code reported by the backend, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}
