//! Streamed chat wrapper around `POST /api/chat/stream`

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use reqwest::Client;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, error, warn};

use super::error::ClientError;
use super::ndjson::{decode_chunks, DecodeError};
use super::{endpoint, lock};
use crate::models::{StreamChatRequest, StreamChunk};

const CHAT_STREAM_PATH: &str = "/api/chat/stream";

/// Receives decoded events while a streamed reply is in flight
pub trait StreamObserver: Send {
    /// A partial answer token arrived
    fn on_chunk(&mut self, text: &str);

    /// The backend sent its terminal chunk
    fn on_complete(&mut self, _chunk: &StreamChunk) {}

    /// The call failed; no further callbacks follow
    fn on_error(&mut self, _error: &ClientError) {}
}

type CompleteFn = Box<dyn FnMut(&StreamChunk) + Send>;
type ErrorFn = Box<dyn FnMut(&ClientError) + Send>;

/// Closure-backed observer
pub struct FnObserver<C> {
    on_chunk: C,
    on_complete: Option<CompleteFn>,
    on_error: Option<ErrorFn>,
}

impl<C> FnObserver<C>
where
    C: FnMut(&str) + Send,
{
    pub fn new(on_chunk: C) -> Self {
        Self {
            on_chunk,
            on_complete: None,
            on_error: None,
        }
    }

    pub fn with_complete(mut self, f: impl FnMut(&StreamChunk) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn with_error(mut self, f: impl FnMut(&ClientError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl<C> StreamObserver for FnObserver<C>
where
    C: FnMut(&str) + Send,
{
    fn on_chunk(&mut self, text: &str) {
        (self.on_chunk)(text)
    }

    fn on_complete(&mut self, chunk: &StreamChunk) {
        if let Some(f) = self.on_complete.as_mut() {
            f(chunk)
        }
    }

    fn on_error(&mut self, error: &ClientError) {
        if let Some(f) = self.on_error.as_mut() {
            f(error)
        }
    }
}

/// Clears the streaming flag however the call exits
struct StreamingGuard<'a>(&'a AtomicBool);

impl<'a> StreamingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for StreamingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Client for the streamed chat endpoint
///
/// Thread id and streaming flag are readable from other tasks while a reply
/// is being relayed.
pub struct ChatStreamApi {
    http_client: Client,
    base_url: String,
    current_thread_id: Mutex<Option<String>>,
    is_streaming: AtomicBool,
}

impl ChatStreamApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            current_thread_id: Mutex::new(None),
            is_streaming: AtomicBool::new(false),
        }
    }

    pub fn current_thread_id(&self) -> Option<String> {
        lock(&self.current_thread_id).clone()
    }

    /// Forget the current thread so the next message starts a new one
    pub fn reset_thread(&self) {
        *lock(&self.current_thread_id) = None;
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming.load(Ordering::SeqCst)
    }

    /// Send a message and relay the streamed reply to `observer`
    ///
    /// Failures are logged and reported through `observer.on_error`.
    pub async fn send_stream_message<O: StreamObserver>(&self, message: &str, observer: &mut O) {
        let _guard = StreamingGuard::start(&self.is_streaming);

        if let Err(e) = self.stream_message(message, observer).await {
            error!("Error in sendStreamMessage: {}", e);
            observer.on_error(&e);
        }
    }

    async fn stream_message<O: StreamObserver>(
        &self,
        message: &str,
        observer: &mut O,
    ) -> Result<(), ClientError> {
        let request = StreamChatRequest {
            message: message.to_string(),
            thread_id: self.current_thread_id(),
        };

        let url = endpoint(&self.base_url, CHAT_STREAM_PATH);
        debug!("POST {}", url);
        let response = self.http_client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        self.consume_stream(response.bytes_stream(), observer).await
    }

    /// Decode an NDJSON body and dispatch each chunk to `observer`
    ///
    /// Lines that fail to parse are skipped. A transport error ends the
    /// stream and is returned.
    pub async fn consume_stream<S, E, O>(
        &self,
        byte_stream: S,
        observer: &mut O,
    ) -> Result<(), ClientError>
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Display + 'static,
        O: StreamObserver,
    {
        let mut chunks = decode_chunks(byte_stream);

        while let Some(item) = chunks.next().await {
            match item {
                Ok(chunk) => self.dispatch(&chunk, observer),
                Err(DecodeError::Transport(e)) => return Err(ClientError::Transport(e)),
                Err(e @ DecodeError::InvalidLine { .. }) => warn!("{}", e),
            }
        }

        Ok(())
    }

    fn dispatch<O: StreamObserver>(&self, chunk: &StreamChunk, observer: &mut O) {
        let Some(data) = chunk.data.as_ref() else {
            return;
        };

        if !data.thread_id.is_empty() {
            let mut current = lock(&self.current_thread_id);
            if current.is_none() {
                *current = Some(data.thread_id.clone());
            }
        }

        if let Some(text) = chunk.partial_answer() {
            observer.on_chunk(text);
        }

        if chunk.is_terminal() {
            observer.on_complete(chunk);
        }
    }
}
