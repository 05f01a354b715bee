//! Backend trait the relay handlers depend on

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use serde_json::Value;
use std::pin::Pin;

use super::error::UpstreamError;
use crate::models::{ChatRequest, StreamChatRequest};

/// Raw body of a streamed backend response
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, UpstreamError>> + Send>>;

/// Interface to the remote assistant backend
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Forward a buffered chat call and return the backend's JSON unchanged
    async fn chat(&self, request: ChatRequest) -> Result<Value, UpstreamError>;

    /// Forward a streamed chat call
    ///
    /// Resolves once the backend has answered with a success status; the
    /// returned stream yields body bytes in the order they arrive.
    async fn chat_stream(&self, request: StreamChatRequest) -> Result<ByteStream, UpstreamError>;
}
