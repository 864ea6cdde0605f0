use serde::{Deserialize, Serialize};

/// Role of a stored chat message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

/// A single chat message.
///
/// Messages are immutable once appended to a session; they are created
/// either from user input or from completion output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message.
    pub role: Role,

    /// The content of the message, always literal text.
    pub content: String,

    /// RFC 3339 timestamp of when the message was created, if stamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    /// Create a new `Message` with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attaches a timestamp to the message.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn message_serialization() {
        let message = Message::user("hi").with_timestamp("2026-08-06T12:00:00Z");
        let json = to_value(&message).unwrap();
        assert_eq!(
            json,
            json!({
                "role": "user",
                "content": "hi",
                "timestamp": "2026-08-06T12:00:00Z"
            })
        );
    }

    #[test]
    fn timestamp_omitted_when_absent() {
        let message = Message::assistant("hey");
        let json = to_value(&message).unwrap();
        assert_eq!(json, json!({"role": "assistant", "content": "hey"}));
    }

    #[test]
    fn constructors_set_roles() {
        assert_eq!(Message::user("a").role, Role::User);
        assert_eq!(Message::assistant("b").role, Role::Assistant);
    }
}
