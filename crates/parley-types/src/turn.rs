//! Stored chat turns.
//!
//! A [`Turn`] is one message of the conversation as persisted in the message
//! store. [`NewTurn`] is what callers hand to the store; the store assigns the
//! id and fills in the timestamp when the caller did not provide one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;
use crate::record::Record;

// Re-export MessageRole from llm module (it's used in both turn and llm contexts).
pub use crate::llm::MessageRole;

/// A stored chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: u64,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// The role/content pair sent to the LLM; id and timestamp are dropped.
    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

/// Fields of a turn before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTurn {
    #[serde(default)]
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewTurn {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl Record for Turn {
    type Draft = NewTurn;

    fn id(&self) -> u64 {
        self.id
    }

    fn from_draft(id: u64, draft: NewTurn, now: DateTime<Utc>) -> Self {
        Turn {
            id,
            role: draft.role,
            content: draft.content,
            timestamp: draft.timestamp.unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_draft_fills_missing_timestamp() {
        let now = Utc::now();
        let turn = Turn::from_draft(1, NewTurn::user("hi"), now);
        assert_eq!(turn.id, 1);
        assert_eq!(turn.role, MessageRole::User);
        assert_eq!(turn.timestamp, now);
    }

    #[test]
    fn test_from_draft_keeps_given_timestamp() {
        let earlier = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let turn = Turn::from_draft(4, NewTurn::assistant("yo").with_timestamp(earlier), Utc::now());
        assert_eq!(turn.timestamp, earlier);
    }

    #[test]
    fn test_new_turn_role_defaults_to_user() {
        let draft: NewTurn = serde_json::from_str(r#"{"content":"first"}"#).unwrap();
        assert_eq!(draft.role, MessageRole::User);
        assert!(draft.timestamp.is_none());
    }

    #[test]
    fn test_turn_serializes_iso_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc);
        let turn = Turn {
            id: 2,
            role: MessageRole::Assistant,
            content: "hello".to_string(),
            timestamp: ts,
        };
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["timestamp"], "2025-03-04T05:06:07Z");
    }

    #[test]
    fn test_to_message_strips_metadata() {
        let turn = Turn::from_draft(9, NewTurn::user("question"), Utc::now());
        assert_eq!(turn.to_message(), ChatMessage::user("question"));
    }
}
