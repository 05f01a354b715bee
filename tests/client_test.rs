//! End-to-end tests: client wrappers -> relay -> fake assistant backend

mod common;

use assistant_relay::client::{ChatApi, ChatStreamApi, ClientError, StreamObserver};
use assistant_relay::models::StreamChunk;

#[derive(Default)]
struct Recorder {
    tokens: Vec<String>,
    completed: Vec<StreamChunk>,
    errors: Vec<String>,
}

impl StreamObserver for Recorder {
    fn on_chunk(&mut self, text: &str) {
        self.tokens.push(text.to_string());
    }

    fn on_complete(&mut self, chunk: &StreamChunk) {
        self.completed.push(chunk.clone());
    }

    fn on_error(&mut self, error: &ClientError) {
        self.errors.push(error.to_string());
    }
}

#[tokio::test]
async fn test_send_message_tracks_thread() {
    let api = ChatApi::new(common::spawn_stack());

    let reply = api.send_message("hello").await.expect("first message");
    assert_eq!(reply.thread_id.as_deref(), Some(common::BUFFERED_THREAD_ID));
    assert_eq!(reply.extra["answer"], "echo: hello");
    assert_eq!(api.thread_id().as_deref(), Some(common::BUFFERED_THREAD_ID));

    // the follow-up carries the stored thread id back to the backend
    let reply = api.send_message("again").await.expect("second message");
    assert_eq!(reply.extra["receivedThreadId"], common::BUFFERED_THREAD_ID);
}

#[tokio::test]
async fn test_send_message_backend_failure_envelope() {
    let api = ChatApi::new(common::spawn_stack());

    let err = api.send_message(common::REJECT_MESSAGE).await.unwrap_err();

    assert!(matches!(err, ClientError::Api(ref m) if m == "Thread not found"));
    assert!(api.thread_id().is_none());
}

#[tokio::test]
async fn test_send_message_backend_error_status() {
    let api = ChatApi::new(common::spawn_stack());

    let err = api.send_message(common::FAIL_MESSAGE).await.unwrap_err();

    assert_eq!(err.to_string(), "API request failed with status 500");
}

#[tokio::test]
async fn test_stream_message_relays_tokens() {
    let api = ChatStreamApi::new(common::spawn_stack());
    let mut recorder = Recorder::default();

    api.send_stream_message("hello", &mut recorder).await;

    assert!(recorder.errors.is_empty(), "errors: {:?}", recorder.errors);
    assert_eq!(recorder.tokens, vec!["Hel", "lo"]);
    assert_eq!(recorder.completed.len(), 1);
    let data = recorder.completed[0].data.as_ref().unwrap();
    assert_eq!(data.answer, "Hello");
    assert_eq!(data.processing_time, Some(0.25));
    assert_eq!(api.current_thread_id().as_deref(), Some(common::STREAM_THREAD_ID));
    assert!(!api.is_streaming());
}

#[tokio::test]
async fn test_reset_thread_starts_fresh() {
    let api = ChatStreamApi::new(common::spawn_stack());

    let mut first = Recorder::default();
    api.send_stream_message("hello", &mut first).await;
    assert_eq!(api.current_thread_id().as_deref(), Some(common::STREAM_THREAD_ID));

    api.reset_thread();
    assert!(api.current_thread_id().is_none());

    let mut second = Recorder::default();
    api.send_stream_message("hello again", &mut second).await;
    assert_eq!(second.tokens, vec!["Hel", "lo"]);
    assert_eq!(api.current_thread_id().as_deref(), Some(common::STREAM_THREAD_ID));
}

#[tokio::test]
async fn test_stream_message_error_status() {
    let api = ChatStreamApi::new(common::spawn_stack());
    let mut recorder = Recorder::default();

    api.send_stream_message(common::FAIL_MESSAGE, &mut recorder).await;

    assert!(recorder.tokens.is_empty());
    assert!(recorder.completed.is_empty());
    assert_eq!(recorder.errors, vec!["HTTP error! status: 500"]);
    assert!(!api.is_streaming());
}

/// Records the streaming flag each time a token arrives
struct FlagWatcher<'a> {
    api: &'a ChatStreamApi,
    flags: Vec<bool>,
}

impl StreamObserver for FlagWatcher<'_> {
    fn on_chunk(&mut self, _text: &str) {
        self.flags.push(self.api.is_streaming());
    }

    fn on_complete(&mut self, _chunk: &StreamChunk) {
        self.flags.push(self.api.is_streaming());
    }
}

#[tokio::test]
async fn test_is_streaming_while_in_flight() {
    let api = ChatStreamApi::new(common::spawn_stack());
    assert!(!api.is_streaming());

    let mut watcher = FlagWatcher {
        api: &api,
        flags: Vec::new(),
    };
    api.send_stream_message("hello", &mut watcher).await;

    // two tokens plus the completion
    assert_eq!(watcher.flags, vec![true, true, true]);
    assert!(!api.is_streaming());
}
