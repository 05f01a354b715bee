//! Assistant backend access
//!
//! The relay never interprets chat content. It forwards request bodies to the
//! backend and hands back either the decoded JSON or the raw byte stream.

pub mod backend;
pub mod error;
pub mod http;

pub use backend::{AssistantBackend, ByteStream};
pub use error::UpstreamError;
pub use http::HttpBackend;
