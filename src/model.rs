// src/model.rs
//
// Boundary between the relay and whichever generative-model backend answers
// support questions. The relay only needs one capability: seed a
// conversation with prior turns, submit the newest user message, and get
// back a lazy sequence of text increments. Anything with that shape can
// stand in for Gemini (tests use an in-memory mock).

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::models::chat::ChatMessage;

/// Lazy, finite sequence of reply fragments. Errors after the first
/// fragment travel inside the stream; there is no restart.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, ModelError>> + Send>>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini API error: {0}")]
    Api(String),

    #[error("stream error: {0}")]
    Stream(String),
}

#[async_trait]
pub trait SupportModel: Send + Sync {
    /// Open a streaming reply for `message`, with `history` (oldest first,
    /// newest turn excluded) as prior conversation context. An `Err` here
    /// means nothing has been streamed yet and can still be reported as a
    /// structured HTTP error.
    async fn start_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<ReplyStream, ModelError>;
}
