//! Caller-side wrappers around the relay endpoints
//!
//! `ChatApi` drives the buffered `/api/chat` call and `ChatStreamApi` the
//! streamed `/api/chat/stream` call. Both remember the thread id the backend
//! hands out so follow-up messages land in the same conversation.

pub mod chat;
pub mod error;
pub mod ndjson;
pub mod stream;

pub use chat::ChatApi;
pub use error::ClientError;
pub use ndjson::{decode_chunks, DecodeError, NdjsonDecoder};
pub use stream::{ChatStreamApi, FnObserver, StreamObserver};

use std::sync::{Mutex, MutexGuard};

/// Lock a state mutex, recovering the value if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
