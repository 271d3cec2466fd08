//! Incremental decoder for the newline-delimited event stream.

use tracing::debug;

use super::event::StreamEvent;

/// Marker every event line must start with.
const FRAME_MARKER: &str = "data: ";

/// Decodes raw body chunks into [`StreamEvent`]s.
///
/// Chunks arrive at transport-chosen boundaries, so a frame may be split
/// across deliveries. The decoder buffers bytes until a full line (up to a
/// `\n`) is available, then parses each complete line independently; the
/// trailing incomplete fragment stays buffered for the next chunk. Splitting
/// on the newline byte also keeps multi-byte UTF-8 sequences intact without
/// any lossy intermediate decode.
///
/// Lines without the `data: ` marker (including the blank separator lines of
/// the wire format) and lines whose payload fails to parse are dropped
/// silently; a stray or partial frame must not take the visualization down.
/// Events are emitted strictly in arrival order.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(event) = Self::decode_line(&line[..line.len() - 1]) {
                events.push(event);
            }
        }
        events
    }

    /// Number of bytes waiting for a line terminator.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    fn decode_line(line: &[u8]) -> Option<StreamEvent> {
        let text = match std::str::from_utf8(line) {
            Ok(text) => text,
            Err(_) => {
                debug!("dropping non-utf8 line ({} bytes)", line.len());
                return None;
            }
        };
        let payload = text.strip_prefix(FRAME_MARKER)?.trim();
        match serde_json::from_str(payload) {
            Ok(event) => Some(event),
            Err(err) => {
                debug!("dropping unparsable frame: {err}");
                None
            }
        }
    }
}
