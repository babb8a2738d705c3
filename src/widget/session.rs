// src/widget/session.rs
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::chat::{ChatMessage, ChatRequest, ChatRole};

/// Shown in place of the pending assistant reply when a turn fails.
pub const FALLBACK_ERROR_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

/// One rendered message in the widget. Unlike the wire `ChatMessage`, these
/// carry an id (so the in-flight reply can be updated in place) and a
/// timestamp for display.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(role: ChatRole, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Where the current turn is in its lifecycle. Exactly one turn can be in
/// flight; `submit` refuses new input until the session returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending,
    Streaming,
}

/// In-memory session state for one page view / CLI run. Nothing here is
/// persisted; a new session starts empty.
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<Message>,
    phase: TurnPhase,
    pending_reply: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            phase: TurnPhase::Idle,
            pending_reply: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != TurnPhase::Idle
    }

    /// Start a new turn. Returns the request to send, carrying the full
    /// history including the new user message (the empty assistant
    /// placeholder is appended locally but never sent). Returns `None` —
    /// and changes nothing — for blank input or while a turn is in flight.
    pub fn submit(&mut self, text: &str) -> Option<ChatRequest> {
        let text = text.trim();
        if text.is_empty() || self.is_busy() {
            return None;
        }

        self.messages.push(Message::new(ChatRole::User, text));

        let request = ChatRequest {
            messages: self
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect(),
        };

        let placeholder = Message::new(ChatRole::Assistant, "");
        self.pending_reply = Some(placeholder.id.clone());
        self.messages.push(placeholder);
        self.phase = TurnPhase::Sending;

        Some(request)
    }

    /// The response stream has opened.
    pub fn begin_streaming(&mut self) {
        if self.phase == TurnPhase::Sending {
            self.phase = TurnPhase::Streaming;
        }
    }

    /// Append one increment to the in-flight reply, preserving arrival order.
    pub fn append_text(&mut self, fragment: &str) {
        if let Some(reply) = self.pending_reply_mut() {
            reply.content.push_str(fragment);
        }
    }

    /// Normal end of turn (`[DONE]` or stream exhaustion).
    pub fn finish_turn(&mut self) {
        self.phase = TurnPhase::Idle;
        self.pending_reply = None;
    }

    /// Failed turn: the placeholder itself becomes the error message. No
    /// extra message is inserted and nothing escapes to the caller.
    pub fn fail_turn(&mut self, detail: Option<&str>) {
        let content = match detail {
            Some(detail) => format!("Sorry, I encountered an error: {}", detail),
            None => FALLBACK_ERROR_MESSAGE.to_string(),
        };
        if let Some(reply) = self.pending_reply_mut() {
            reply.content = content;
        }
        self.phase = TurnPhase::Idle;
        self.pending_reply = None;
    }

    fn pending_reply_mut(&mut self) -> Option<&mut Message> {
        let id = self.pending_reply.as_deref()?;
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_blank_is_noop() {
        let mut session = ChatSession::new();
        assert!(session.submit("").is_none());
        assert!(session.submit("   ").is_none());
        assert!(session.submit("\t\n").is_none());
        assert!(session.messages().is_empty());
        assert_eq!(session.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_submit_appends_user_and_placeholder() {
        let mut session = ChatSession::new();
        let request = session.submit("  hello  ").unwrap();

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].role, ChatRole::User);
        assert_eq!(session.messages()[0].content, "hello");
        assert_eq!(session.messages()[1].role, ChatRole::Assistant);
        assert_eq!(session.messages()[1].content, "");
        assert_eq!(session.phase(), TurnPhase::Sending);

        // The request carries the new user message but not the placeholder.
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "hello");
    }

    #[test]
    fn test_submit_while_busy_is_noop() {
        let mut session = ChatSession::new();
        session.submit("first").unwrap();
        assert!(session.submit("second").is_none());
        assert_eq!(session.messages().len(), 2);

        session.begin_streaming();
        assert!(session.submit("third").is_none());
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn test_increments_append_in_order() {
        let mut session = ChatSession::new();
        session.submit("hi").unwrap();
        session.begin_streaming();
        session.append_text("Hello");
        session.append_text(" there");
        session.append_text("!");
        session.finish_turn();

        assert_eq!(session.messages()[1].content, "Hello there!");
        assert_eq!(session.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_next_turn_carries_full_history() {
        let mut session = ChatSession::new();
        session.submit("hi").unwrap();
        session.begin_streaming();
        session.append_text("Hello!");
        session.finish_turn();

        let request = session.submit("more please").unwrap();
        let roles: Vec<ChatRole> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant, ChatRole::User]);
        assert_eq!(request.messages[1].content, "Hello!");
    }

    #[test]
    fn test_fail_turn_overwrites_placeholder_in_place() {
        let mut session = ChatSession::new();
        session.submit("hi").unwrap();
        session.begin_streaming();
        session.append_text("partial");
        let placeholder_id = session.messages()[1].id.clone();

        session.fail_turn(Some("connection reset"));

        assert_eq!(session.messages().len(), 2, "no extra message inserted");
        assert_eq!(session.messages()[1].id, placeholder_id);
        assert_eq!(
            session.messages()[1].content,
            "Sorry, I encountered an error: connection reset"
        );
        assert_eq!(session.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_fail_turn_without_detail_uses_fallback() {
        let mut session = ChatSession::new();
        session.submit("hi").unwrap();
        session.fail_turn(None);
        assert_eq!(session.messages()[1].content, FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_can_submit_again_after_failure() {
        let mut session = ChatSession::new();
        session.submit("hi").unwrap();
        session.fail_turn(None);
        assert!(session.submit("retry").is_some());
    }
}
