// src/handlers/chat.rs
use crate::model::{ModelError, ReplyStream, SupportModel};
use crate::models::chat::{ChatMessage, ChatRequest, ChatRole};
use crate::AppState;
use axum::{
    body::{Body, Bytes},
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn chat_routes() -> Router {
    Router::new().route("/api/chat", post(relay_chat))
}

/// Everything that can go wrong before the first streamed byte. Once
/// streaming has started the contract switches to "broken connection means
/// failure" and none of these apply.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Invalid request: messages array required")]
    MissingMessages,

    #[error("Last message must be from user")]
    LastMessageNotUser,

    #[error("API key not configured. Please set GEMINI_API_KEY environment variable.")]
    MissingApiKey,

    #[error("{0}")]
    Upstream(#[from] ModelError),
}

impl RelayError {
    fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingMessages | RelayError::LastMessageNotUser => {
                StatusCode::BAD_REQUEST
            }
            RelayError::MissingApiKey | RelayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn relay_chat(Extension(state): Extension<Arc<AppState>>, body: String) -> Response {
    let model = state
        .gemini_client
        .as_ref()
        .map(|client| client as &dyn SupportModel);

    match respond(model, &body).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("chat request rejected: {}", e);
            e.into_response()
        }
    }
}

/// Validate, split history from the newest turn, open the upstream stream,
/// and wrap it as a server-sent-event response. Takes the model by trait so
/// tests can substitute a scripted backend. Validation runs before the
/// credential check: a malformed request is the caller's error regardless
/// of how the server is deployed.
pub async fn respond(
    model: Option<&dyn SupportModel>,
    body: &str,
) -> Result<Response, RelayError> {
    let request = parse_request(body)?;

    // Non-empty is guaranteed by parse_request.
    let (latest, history) = request
        .messages
        .split_last()
        .ok_or(RelayError::MissingMessages)?;
    if latest.role != ChatRole::User {
        return Err(RelayError::LastMessageNotUser);
    }

    let model = model.ok_or_else(|| {
        tracing::error!("chat request received but GEMINI_API_KEY is not configured");
        RelayError::MissingApiKey
    })?;

    tracing::info!(history_turns = history.len(), "relaying chat turn");

    let reply = model.start_reply(history, &latest.content).await?;

    let headers = [
        (header::CONTENT_TYPE, "text/event-stream"),
        (header::CACHE_CONTROL, "no-cache"),
        (header::CONNECTION, "keep-alive"),
    ];
    Ok((StatusCode::OK, headers, Body::from_stream(sse_frames(reply))).into_response())
}

/// Parse-don't-trust: the body is only accepted once it proves to be JSON
/// carrying a non-empty `messages` array of well-formed turns. A body that
/// is not JSON at all has no messages array either, and gets the same
/// structured 400 (never an extractor's plain-text rejection).
fn parse_request(body: &str) -> Result<ChatRequest, RelayError> {
    let body: Value = serde_json::from_str(body).map_err(|_| RelayError::MissingMessages)?;
    let messages = body
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(RelayError::MissingMessages)?;
    if messages.is_empty() {
        return Err(RelayError::MissingMessages);
    }

    let messages: Vec<ChatMessage> = serde_json::from_value(Value::Array(messages.clone()))
        .map_err(|_| RelayError::MissingMessages)?;

    Ok(ChatRequest { messages })
}

/// Re-emit model increments as `data: {"text":...}` frames, closing with
/// the `[DONE]` marker. Empty increments produce no frame. A mid-stream
/// model error is forwarded as a stream error, which aborts the response
/// body without a terminator — the client detects the truncation.
fn sse_frames(reply: ReplyStream) -> impl Stream<Item = Result<Bytes, ModelError>> {
    async_stream::stream! {
        let mut reply = reply;
        while let Some(increment) = reply.next().await {
            match increment {
                Ok(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    let frame = format!("data: {}\n\n", json!({ "text": text }));
                    yield Ok(Bytes::from(frame));
                }
                Err(e) => {
                    tracing::error!("upstream stream failed mid-reply: {}", e);
                    yield Err(e);
                    return;
                }
            }
        }
        yield Ok(Bytes::from("data: [DONE]\n\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted backend: records what the relay asked for and replays a
    /// fixed set of increments.
    struct MockModel {
        increments: Vec<Result<String, ModelError>>,
        seen: Mutex<Option<(Vec<ChatMessage>, String)>>,
    }

    impl MockModel {
        fn replying(increments: &[&str]) -> Self {
            Self {
                increments: increments.iter().map(|s| Ok(s.to_string())).collect(),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SupportModel for MockModel {
        async fn start_reply(
            &self,
            history: &[ChatMessage],
            message: &str,
        ) -> Result<ReplyStream, ModelError> {
            *self.seen.lock().unwrap() = Some((history.to_vec(), message.to_string()));
            let items: Vec<Result<String, ModelError>> = self
                .increments
                .iter()
                .map(|r| match r {
                    Ok(s) => Ok(s.clone()),
                    Err(_) => Err(ModelError::Stream("scripted failure".into())),
                })
                .collect();
            Ok(Box::pin(futures::stream::iter(items)))
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn valid_body() -> String {
        json!({
            "messages": [
                { "role": "user", "content": "hi" },
                { "role": "assistant", "content": "hello, how can I help?" },
                { "role": "user", "content": "what do you do?" }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_missing_messages_key_rejected() {
        let model = MockModel::replying(&["never"]);
        let err = respond(Some(&model), "{}").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: messages array required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(model.seen.lock().unwrap().is_none(), "upstream must not be called");
    }

    #[tokio::test]
    async fn test_non_array_messages_rejected() {
        let model = MockModel::replying(&["never"]);
        let err = respond(Some(&model), r#"{"messages":"nope"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: messages array required");
        assert!(model.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_messages_rejected() {
        let model = MockModel::replying(&["never"]);
        let err = respond(Some(&model), r#"{"messages":[]}"#)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: messages array required");
        assert!(model.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_message_rejected() {
        let model = MockModel::replying(&["never"]);
        let body = r#"{"messages":[{"role":"wizard","content":"hi"}]}"#;
        let err = respond(Some(&model), body).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: messages array required");
    }

    #[tokio::test]
    async fn test_non_json_body_gets_structured_error() {
        let model = MockModel::replying(&["never"]);
        let err = respond(Some(&model), "this is not json").await.unwrap_err();
        assert!(model.seen.lock().unwrap().is_none());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let parsed: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(parsed["error"], "Invalid request: messages array required");
    }

    #[tokio::test]
    async fn test_last_message_must_be_from_user() {
        let model = MockModel::replying(&["never"]);
        let body = json!({
            "messages": [
                { "role": "user", "content": "hi" },
                { "role": "assistant", "content": "hello" }
            ]
        })
        .to_string();
        let err = respond(Some(&model), &body).await.unwrap_err();
        assert_eq!(err.to_string(), "Last message must be from user");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(model.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_request_beats_missing_api_key() {
        // A malformed request is a 400 even when no model is configured.
        let err = respond(None, "{}").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: messages array required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let body = json!({
            "messages": [{ "role": "assistant", "content": "hello" }]
        })
        .to_string();
        let err = respond(None, &body).await.unwrap_err();
        assert_eq!(err.to_string(), "Last message must be from user");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_api_key_only_for_valid_requests() {
        let err = respond(None, &valid_body()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "API key not configured. Please set GEMINI_API_KEY environment variable."
        );
    }

    #[tokio::test]
    async fn test_history_excludes_latest_and_preserves_order() {
        let model = MockModel::replying(&["ok"]);
        let response = respond(Some(&model), &valid_body()).await.unwrap();
        // Drain the body so the turn completes.
        let _ = body_text(response).await;

        let seen = model.seen.lock().unwrap();
        let (history, message) = seen.as_ref().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].content, "hello, how can I help?");
        assert_eq!(message, "what do you do?");
    }

    #[tokio::test]
    async fn test_stream_frames_exact() {
        let model = MockModel::replying(&["Hello", " there", "!"]);
        let response = respond(Some(&model), &valid_body()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-cache");

        let body = body_text(response).await;
        assert_eq!(
            body,
            "data: {\"text\":\"Hello\"}\n\n\
             data: {\"text\":\" there\"}\n\n\
             data: {\"text\":\"!\"}\n\n\
             data: [DONE]\n\n"
        );
    }

    #[tokio::test]
    async fn test_empty_increment_emits_no_frame() {
        let model = MockModel::replying(&["Hello", "", "!"]);
        let response = respond(Some(&model), &valid_body()).await.unwrap();
        let body = body_text(response).await;
        assert_eq!(
            body,
            "data: {\"text\":\"Hello\"}\n\ndata: {\"text\":\"!\"}\n\ndata: [DONE]\n\n"
        );
    }

    #[tokio::test]
    async fn test_mid_stream_error_aborts_without_done() {
        let model = MockModel {
            increments: vec![Ok("partial".into()), Err(ModelError::Stream("boom".into()))],
            seen: Mutex::new(None),
        };
        let response = respond(Some(&model), &valid_body()).await.unwrap();
        let result = axum::body::to_bytes(response.into_body(), usize::MAX).await;
        assert!(result.is_err(), "body read must fail once the stream aborts");
    }

    #[tokio::test]
    async fn test_missing_api_key_response_shape() {
        let response = RelayError::MissingApiKey.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            parsed["error"],
            "API key not configured. Please set GEMINI_API_KEY environment variable."
        );
    }
}
