use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::model::{ModelError, ReplyStream, SupportModel};
use crate::models::chat::{ChatMessage, ChatRole};
use crate::persona::SYSTEM_PROMPT;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl Content {
    fn turn(role: &str, text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
            role: Some(role.to_string()),
        }
    }

    fn system(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
            role: None,
        }
    }
}

/// Map our two wire roles onto Gemini's turn roles.
fn gemini_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "model",
    }
}

/// Build the ordered `contents` array for one streaming call: prior turns
/// first, then the new user message as the final turn.
pub fn conversation_contents(history: &[ChatMessage], message: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|msg| Content::turn(gemini_role(msg.role), &msg.content))
        .collect();
    contents.push(Content::turn("user", message));
    contents
}

/// Text of the first candidate, with multi-part chunks concatenated.
fn candidate_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl SupportModel for GeminiClient {
    async fn start_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<ReplyStream, ModelError> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: conversation_contents(history, message),
            system_instruction: Some(Content::system(SYSTEM_PROMPT)),
        };

        tracing::debug!(
            history_turns = history.len(),
            model = %self.model,
            "opening Gemini stream"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Gemini API rejected the request: {}", error_text);
            return Err(ModelError::Api(error_text));
        }

        let stream = async_stream::stream! {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(ModelError::Stream(e.to_string()));
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // Process complete SSE events from the buffer. Chunk
                // boundaries can fall anywhere, so everything after the
                // last "\n\n" stays buffered for the next read.
                while let Some(pos) = buffer.find("\n\n") {
                    let event_str = buffer[..pos].to_string();
                    buffer = buffer[pos + 2..].to_string();

                    for line in event_str.lines() {
                        let Some(data) = line.strip_prefix("data: ") else {
                            continue;
                        };
                        if data.trim().is_empty() {
                            continue;
                        }

                        let parsed: GenerateContentResponse = match serde_json::from_str(data) {
                            Ok(r) => r,
                            Err(e) => {
                                tracing::warn!("skipping unparseable Gemini chunk: {}", e);
                                continue;
                            }
                        };

                        yield Ok(candidate_text(&parsed));
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("What services do you offer?"),
            ChatMessage::assistant("We offer cybersecurity, cloud, and more."),
        ]
    }

    #[test]
    fn test_history_roles_mapped_in_order() {
        let contents = conversation_contents(&history(), "Tell me about pricing");

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[0].parts[0].text, "What services do you offer?");
        assert_eq!(contents[1].role.as_deref(), Some("model"));
        assert_eq!(contents[2].role.as_deref(), Some("user"));
        assert_eq!(contents[2].parts[0].text, "Tell me about pricing");
    }

    #[test]
    fn test_request_serializes_camel_case_system_instruction() {
        let request = GenerateContentRequest {
            contents: conversation_contents(&[], "hi"),
            system_instruction: Some(Content::system("persona")),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "persona");
        // System instruction carries no role field.
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn test_candidate_text_concatenates_parts() {
        let chunk: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hel"},{"text":"lo"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(candidate_text(&chunk), "Hello");
    }

    #[test]
    fn test_candidate_text_tolerates_empty_chunk() {
        let chunk: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(candidate_text(&chunk), "");
    }
}
