//! Incremental decoding of the backend's line-oriented event stream.
//!
//! The transport delivers chunks at arbitrary byte boundaries; logical
//! messages are lines. Only lines whose trimmed form starts with `data: `
//! carry payloads, and only payloads with a string `delta` field produce
//! output. Everything else on the wire (keepalives, `event:`/`id:` comments,
//! malformed JSON from degenerate producers) is dropped without failing the
//! stream.
//!
//! The decoder is deliberately transport-free: the network task feeds it
//! chunks and forwards emitted deltas over a channel as [`StreamEvent`]s, so
//! chunk-boundary behavior is testable without a socket.

use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Messages sent from a network task into the session's event loop.
pub enum StreamEvent {
    /// One incremental fragment of generated text, in arrival order.
    Delta(String),
    /// The stream completed and the final buffer flush has run.
    Done,
    /// The transport failed or returned a non-success status. Deltas already
    /// delivered stay delivered; nothing is retracted.
    Error(String),
}

impl StreamEvent {
    #[must_use]
    /// Extract the fragment if this is a delta event.
    pub fn as_delta(&self) -> Option<&str> {
        match self {
            Self::Delta(text) => Some(text),
            Self::Done | Self::Error(_) => None,
        }
    }

    #[must_use]
    /// True once no further events will follow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error(_))
    }
}

#[derive(Debug, Default)]
/// Reassembles protocol lines from arbitrarily-chunked text and emits the
/// `delta` payloads they carry, strictly in arrival order.
pub struct SseDecoder {
    /// Trailing fragment of the last chunk that has not yet seen its newline.
    pending: String,
}

impl SseDecoder {
    #[must_use]
    /// A decoder with an empty line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one transport chunk, invoking `sink` once per completed delta.
    ///
    /// The chunk is appended to the pending buffer, every complete line is
    /// processed, and the trailing fragment (if any) is held back for the
    /// next chunk, so a frame split across chunks is emitted exactly once.
    pub fn push<F: FnMut(String)>(&mut self, chunk: &str, sink: &mut F) {
        self.pending.push_str(chunk);
        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            process_line(line.trim_end_matches('\n'), sink);
        }
    }

    /// Flushes the final, unterminated line once the transport reports
    /// completion.
    pub fn finish<F: FnMut(String)>(self, sink: &mut F) {
        if !self.pending.is_empty() {
            process_line(&self.pending, sink);
        }
    }
}

/// Handles one complete protocol line. Non-`data:` lines, payloads without a
/// string `delta`, and malformed JSON are all silently skipped.
fn process_line<F: FnMut(String)>(line: &str, sink: &mut F) {
    let Some(payload) = line.trim().strip_prefix("data: ") else {
        return;
    };
    match serde_json::from_str::<Value>(payload) {
        Ok(frame) => {
            if let Some(delta) = frame.get("delta").and_then(Value::as_str) {
                sink(delta.to_string());
            } else {
                log::debug!("skipping frame without delta field");
            }
        }
        Err(err) => {
            log::debug!("skipping malformed frame: {err}");
        }
    }
}

#[cfg(test)]
#[path = "tests/stream.rs"]
mod tests;
