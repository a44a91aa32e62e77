//! Incremental decoder for `text/event-stream` bodies.
//!
//! Network chunks split frames (and UTF-8 sequences) at arbitrary byte
//! offsets, so bytes are buffered until a blank line closes a frame:
//!
//! ```text
//! data: {"type":"connected","message":"Connected to notifications","timestamp":1700000000000}
//!
//! :keep-alive
//!
//! data: {"type":"booking","data":{...},"timestamp":1700000000123}
//!
//! ```

use crate::domain::notifications::EventEnvelope;

/// Largest frame the decoder buffers before discarding it.
pub const MAX_FRAME_BYTES: usize = 1 << 20;

/// Buffers stream bytes and yields complete envelopes.
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    // Bytes already searched for a terminator.
    scanned: usize,
    max_frame: usize,
    // Dropping the tail of an oversized frame until its terminator.
    skipping: bool,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::with_max_frame(MAX_FRAME_BYTES)
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_frame(max_frame: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            max_frame,
            skipping: false,
        }
    }

    /// Feeds one chunk and returns every envelope it completed.
    ///
    /// Comment frames and frames without `data:` lines are skipped.
    /// Frames whose payload is not a valid envelope are discarded, as are
    /// frames longer than the decoder's frame limit.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<EventEnvelope> {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut envelopes = Vec::new();
        loop {
            // A terminator may straddle the previous scan boundary.
            let start = self.scanned.saturating_sub(1);
            let found = self.buffer[start..]
                .windows(2)
                .position(|w| w == b"\n\n")
                .map(|offset| start + offset);

            let Some(end) = found else {
                self.scanned = self.buffer.len();
                if self.buffer.len() > self.max_frame {
                    self.discard_oversized();
                }
                break;
            };

            let frame: Vec<u8> = self.buffer.drain(..end + 2).collect();
            self.scanned = 0;
            if std::mem::take(&mut self.skipping) {
                continue;
            }
            if let Some(envelope) = decode_frame(&frame[..end]) {
                envelopes.push(envelope);
            }
        }
        envelopes
    }

    fn discard_oversized(&mut self) {
        if !self.skipping {
            tracing::debug!(
                buffered = self.buffer.len(),
                limit = self.max_frame,
                "Discarding oversized notification frame"
            );
        }
        // Keep a trailing newline so a terminator split across chunks is still seen.
        let keep_newline = self.buffer.last() == Some(&b'\n');
        self.buffer.clear();
        if keep_newline {
            self.buffer.push(b'\n');
        }
        self.scanned = self.buffer.len();
        self.skipping = true;
    }

    /// Bytes of an incomplete frame still waiting for its terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Ends the stream, discarding any incomplete trailing frame.
    ///
    /// Returns the number of bytes discarded.
    pub fn finish(&mut self) -> usize {
        let discarded = self.buffer.len();
        self.buffer.clear();
        self.scanned = 0;
        self.skipping = false;
        discarded
    }
}

fn decode_frame(frame: &[u8]) -> Option<EventEnvelope> {
    let text = match std::str::from_utf8(frame) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding non UTF-8 notification frame");
            return None;
        }
    };

    let mut data: Option<String> = None;
    for line in text.split('\n') {
        if line.starts_with(':') {
            continue;
        }
        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            match data.as_mut() {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(value);
                }
                None => data = Some(value.to_string()),
            }
        }
    }

    let data = data?;
    match serde_json::from_str::<EventEnvelope>(&data) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            tracing::debug!(error = %e, "Discarding malformed notification envelope");
            None
        }
    }
}
