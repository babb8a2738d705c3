// src/widget/client.rs
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;

use crate::widget::session::ChatSession;
use crate::widget::sse::{SseLineDecoder, StreamEvent};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Drives one chat turn against a running relay. All failures end up inside
/// the session (as the overwritten placeholder message); nothing is thrown
/// past this boundary.
pub struct WidgetClient {
    http: Client,
    endpoint: String,
}

impl WidgetClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Submit `text` and stream the reply into the session. `render` is
    /// called with each fragment as it arrives so the caller can paint
    /// incrementally. Returns false when the input was a no-op (blank text
    /// or a turn already in flight).
    pub async fn send(
        &self,
        session: &mut ChatSession,
        text: &str,
        mut render: impl FnMut(&str),
    ) -> bool {
        let Some(request) = session.submit(text) else {
            return false;
        };

        let response = match self.http.post(&self.endpoint).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("chat request failed to send: {}", e);
                session.fail_turn(Some(&e.to_string()));
                return true;
            }
        };

        if !response.status().is_success() {
            // The relay reports pre-stream failures as {"error": ...}.
            let detail = response.json::<ErrorBody>().await.ok().map(|b| b.error);
            session.fail_turn(detail.as_deref());
            return true;
        }

        session.begin_streaming();

        let mut decoder = SseLineDecoder::new();
        let mut byte_stream = response.bytes_stream();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("chat stream broke mid-reply: {}", e);
                    session.fail_turn(Some(&e.to_string()));
                    return true;
                }
            };

            for event in decoder.push(&chunk) {
                match event {
                    StreamEvent::Text(fragment) => {
                        session.append_text(&fragment);
                        render(&fragment);
                    }
                    StreamEvent::Done => {
                        session.finish_turn();
                        return true;
                    }
                }
            }
        }

        // Stream ended without [DONE]: treated the same as a normal end of
        // turn; the transcript keeps whatever arrived.
        session.finish_turn();
        true
    }
}
