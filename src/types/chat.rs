use serde::{Deserialize, Serialize};

use crate::types::{Message, Role};

/// Role tag for a prompt segment sent to the completion runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    /// The system directive segment.
    System,

    /// A user turn.
    User,

    /// An assistant turn.
    Assistant,
}

/// One role-tagged segment of an assembled prompt.
///
/// Segments serialize directly as the `messages` entries of a chat
/// completion request. Content is always literal text; nothing downstream
/// re-interprets it as a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// The role of the segment.
    pub role: PromptRole,

    /// The literal text of the segment.
    pub content: String,
}

impl PromptMessage {
    /// Create a new system segment.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    /// Create a new user segment.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant segment.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Message> for PromptMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => PromptRole::User,
            Role::Assistant => PromptRole::Assistant,
        };
        Self {
            role,
            content: message.content.clone(),
        }
    }
}

/// Sampling options forwarded to the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChatOptions {
    /// Sampling temperature in [0.0, 1.0].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model identifier the runtime knows.
    pub model: String,

    /// Ordered prompt segments, system directive first.
    pub messages: Vec<PromptMessage>,

    /// Whether to stream the response.
    pub stream: bool,

    /// Sampling options.
    pub options: ChatOptions,
}

impl ChatRequest {
    /// Create a new streaming chat request.
    pub fn new(model: impl Into<String>, messages: Vec<PromptMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: true,
            options: ChatOptions::default(),
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }
}

/// The message fragment inside one streamed chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMessage {
    /// Role reported by the runtime, always "assistant" in practice.
    pub role: PromptRole,

    /// The incremental text of this chunk.
    pub content: String,
}

/// One newline-delimited JSON object of a streamed chat response.
///
/// Successful streams are a sequence of chunks with `done: false` followed
/// by a final chunk with `done: true`. The runtime reports mid-stream
/// failures as an object carrying only an `error` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChunk {
    /// The incremental message payload, absent on terminal chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<ChunkMessage>,

    /// True on the terminal chunk of a completed stream.
    #[serde(default)]
    pub done: bool,

    /// Error reported by the runtime, if the stream failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn request_serialization() {
        let request = ChatRequest::new(
            "deepseek-r1:1.5b",
            vec![
                PromptMessage::system("Be terse."),
                PromptMessage::user("hi"),
            ],
        )
        .with_temperature(0.3);
        let json = to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "model": "deepseek-r1:1.5b",
                "messages": [
                    {"role": "system", "content": "Be terse."},
                    {"role": "user", "content": "hi"}
                ],
                "stream": true,
                "options": {"temperature": 0.3}
            })
        );
    }

    #[test]
    fn temperature_omitted_when_unset() {
        let request = ChatRequest::new("mistral", vec![]);
        let json = to_value(&request).unwrap();
        assert_eq!(json["options"], json!({}));
    }

    #[test]
    fn chunk_deserialization() {
        let chunk: ChatChunk = serde_json::from_str(
            r#"{"message":{"role":"assistant","content":"Hel"},"done":false}"#,
        )
        .unwrap();
        assert_eq!(chunk.message.unwrap().content, "Hel");
        assert!(!chunk.done);
        assert!(chunk.error.is_none());

        let done: ChatChunk = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(done.done);

        let failed: ChatChunk = serde_json::from_str(r#"{"error":"model not found"}"#).unwrap();
        assert_eq!(failed.error.as_deref(), Some("model not found"));
    }

    #[test]
    fn prompt_message_from_stored_message() {
        let stored = Message::assistant("hey").with_timestamp("T2");
        let segment = PromptMessage::from(&stored);
        assert_eq!(segment.role, PromptRole::Assistant);
        assert_eq!(segment.content, "hey");
    }
}
