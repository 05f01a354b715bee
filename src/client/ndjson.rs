//! Newline-delimited JSON decoder for streamed chat responses

use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream};
use futures::StreamExt;
use std::collections::VecDeque;
use std::fmt::Display;
use thiserror::Error;

use crate::models::StreamChunk;

/// Failures while decoding a chunk stream
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The underlying byte stream failed; no further chunks follow
    #[error("Stream transport error: {0}")]
    Transport(String),

    /// One line was not a valid chunk; decoding continues with the next line
    #[error("Error parsing chunk: {reason}. Line: {line}")]
    InvalidLine { line: String, reason: String },
}

/// Incremental line splitter
///
/// Bytes are buffered until a `\n` arrives, so lines (and UTF-8 sequences)
/// split across transport reads are reassembled before parsing.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, returning every complete non-blank line
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(line) = to_line(&raw[..raw.len() - 1]) {
                lines.push(line);
            }
        }
        lines
    }

    /// Flush the trailing line left when the stream ends without a newline
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        to_line(&rest)
    }

    /// Bytes held back waiting for a line terminator
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn to_line(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a single NDJSON line
pub fn parse_line(line: &str) -> Result<StreamChunk, DecodeError> {
    serde_json::from_str(line).map_err(|e| DecodeError::InvalidLine {
        line: line.to_string(),
        reason: e.to_string(),
    })
}

struct DecodeState {
    inner: BoxStream<'static, Result<Bytes, String>>,
    decoder: NdjsonDecoder,
    pending: VecDeque<String>,
    done: bool,
}

/// Turn a body byte stream into a stream of parsed chunks
///
/// Chunks come out in arrival order. A transport error is yielded once and
/// ends the stream.
pub fn decode_chunks<S, E>(byte_stream: S) -> BoxStream<'static, Result<StreamChunk, DecodeError>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + 'static,
{
    let state = DecodeState {
        inner: byte_stream.map(|r| r.map_err(|e| e.to_string())).boxed(),
        decoder: NdjsonDecoder::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(line) = state.pending.pop_front() {
                return Some((parse_line(&line), state));
            }
            if state.done {
                return None;
            }
            match state.inner.next().await {
                Some(Ok(bytes)) => state.pending.extend(state.decoder.push(&bytes)),
                Some(Err(e)) => {
                    state.done = true;
                    state.pending.clear();
                    return Some((Err(DecodeError::Transport(e)), state));
                }
                None => {
                    state.done = true;
                    state.pending.extend(state.decoder.finish());
                }
            }
        }
    })
    .boxed()
}
