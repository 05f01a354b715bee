// Wire types shared by the relay handlers and the client wrappers

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Read an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Request Types

/// Body of a buffered chat call. The backend expects `threadId` on this path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "threadId", default)]
    pub thread_id: Option<String>,
}

/// Body of a streamed chat call. The backend expects `thread_id` on this path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamChatRequest {
    pub message: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

// Buffered Response

/// Envelope returned by `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatEnvelope {
    #[serde(default)]
    pub success: Value,
    /// Backends send this as either a string or a number
    #[serde(default)]
    pub code: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ChatEnvelope {
    /// Failure envelope the relay sends when the backend call did not succeed
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: Value::from(0),
            code: Value::from("1"),
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success.as_f64() == Some(1.0)
    }
}

/// `data` payload of a successful buffered response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    #[serde(rename = "threadId", default)]
    pub thread_id: Option<String>,
    /// Everything else the backend sent alongside the thread id
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// Stream Chunk Types

/// One NDJSON line of the streamed response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StreamChunk {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub data: Option<StreamChunkData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StreamChunkData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thread_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

/// Marker value of `StreamChunk::message` for partial tokens
pub const STREAMING_MARKER: &str = "streaming";
/// Marker value of `StreamChunk::message` for the terminal chunk
pub const COMPLETE_MARKER: &str = "complete";

impl StreamChunk {
    /// Partial answer text, if this chunk carries one
    pub fn partial_answer(&self) -> Option<&str> {
        let data = self.data.as_ref()?;
        if self.message == STREAMING_MARKER && !data.answer.is_empty() {
            Some(&data.answer)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.message == COMPLETE_MARKER && self.data.as_ref().is_some_and(|d| d.is_complete)
    }
}

// Error Body

/// JSON body of a failed streamed call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}
