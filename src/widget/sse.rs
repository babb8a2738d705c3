// src/widget/sse.rs
use serde::Deserialize;

/// One decoded frame from the relay's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental piece of the assistant's reply.
    Text(String),
    /// The relay's end-of-turn marker (`data: [DONE]`).
    Done,
}

#[derive(Debug, Deserialize)]
struct TextFrame {
    text: String,
}

/// Incremental decoder for `data: <json>` lines. The transport gives no
/// framing guarantee below the line boundary: a read may carry half a line
/// or several at once, so raw bytes accumulate here until a full line is
/// available. Lines that are not valid frames are dropped silently.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: String,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, returning every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);

            let Some(data) = line.strip_prefix("data: ") else {
                continue;
            };

            if data == "[DONE]" {
                events.push(StreamEvent::Done);
                continue;
            }

            // Malformed payloads are skipped, not fatal.
            if let Ok(frame) = serde_json::from_str::<TextFrame>(data) {
                events.push(StreamEvent::Text(frame.text));
            }
        }
        events
    }
}
