//! reqwest implementation of the backend trait

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::backend::{AssistantBackend, ByteStream};
use super::error::UpstreamError;
use crate::config::{normalize_base_url, RelayConfig};
use crate::models::{ChatRequest, StreamChatRequest};

const CHAT_PATH: &str = "/assistant/chat";
const CHAT_STREAM_PATH: &str = "/assistant/chat/stream";

/// Client for the assistant backend's HTTP API
#[derive(Clone)]
pub struct HttpBackend {
    /// HTTP client for making requests
    http_client: Client,
    /// Backend base URL, without a trailing slash
    api_url: String,
}

impl HttpBackend {
    /// Create a backend client from relay configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &RelayConfig) -> Result<Self, UpstreamError> {
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(http_client, config.api_url.clone()))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(http_client: Client, api_url: impl Into<String>) -> Self {
        Self {
            http_client,
            api_url: normalize_base_url(api_url.into()),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// POST a JSON body and fail on non-success statuses
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn chat(&self, request: ChatRequest) -> Result<Value, UpstreamError> {
        let response = self.post_json(CHAT_PATH, &request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn chat_stream(&self, request: StreamChatRequest) -> Result<ByteStream, UpstreamError> {
        let response = self.post_json(CHAT_STREAM_PATH, &request).await?;
        let byte_stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(UpstreamError::from));
        Ok(Box::pin(byte_stream))
    }
}
