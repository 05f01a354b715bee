//! Buffered chat wrapper around `POST /api/chat`

use reqwest::Client;
use std::sync::Mutex;
use tracing::{debug, error};

use super::error::ClientError;
use super::{endpoint, lock};
use crate::models::{ChatEnvelope, ChatReply, ChatRequest};

const CHAT_PATH: &str = "/api/chat";
const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Client for the buffered chat endpoint
pub struct ChatApi {
    http_client: Client,
    base_url: String,
    thread_id: Mutex<Option<String>>,
}

impl ChatApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            thread_id: Mutex::new(None),
        }
    }

    pub fn thread_id(&self) -> Option<String> {
        lock(&self.thread_id).clone()
    }

    /// Send a message on the current thread
    ///
    /// On success the thread id from the reply becomes the current thread.
    ///
    /// # Errors
    ///
    /// `SendFailed` when the relay could not be reached or answered with an
    /// error status, `Api` when the envelope reports a failure.
    pub async fn send_message(&self, message: &str) -> Result<ChatReply, ClientError> {
        let envelope = self.post(message).await.map_err(|e| {
            error!("Error sending message: {}", e);
            ClientError::SendFailed {
                reason: e.to_string(),
            }
        })?;

        self.accept(envelope)
    }

    /// Turn a relayed envelope into a reply, storing its thread id on success
    fn accept(&self, envelope: ChatEnvelope) -> Result<ChatReply, ClientError> {
        let success = envelope.is_success();
        match envelope.data {
            Some(data) if success => {
                let reply: ChatReply = serde_json::from_value(data)?;
                *lock(&self.thread_id) = reply.thread_id.clone();
                Ok(reply)
            }
            _ => {
                let message = if envelope.message.is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    envelope.message
                };
                error!("Error in sendMessage: {}", message);
                Err(ClientError::Api(message))
            }
        }
    }

    async fn post(&self, message: &str) -> Result<ChatEnvelope, ClientError> {
        let request = ChatRequest {
            message: message.to_string(),
            thread_id: self.thread_id(),
        };

        let url = endpoint(&self.base_url, CHAT_PATH);
        debug!("POST {}", url);
        let response = self.http_client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
