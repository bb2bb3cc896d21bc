//! LLM request/response types for Parley.
//!
//! These types model the data shapes exchanged with a chat-completion
//! endpoint: role-tagged messages, per-call options, the structured
//! completion and the raw payloads kept for the request log.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    #[default]
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single role-tagged message as sent to (or received from) the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Which configured model a call should use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSelection {
    /// The primary model from configuration.
    #[default]
    Primary,
    /// The optional secondary model. Falls back to the primary model when
    /// none is configured.
    Additional,
    /// An explicit model identifier.
    Named(String),
}

/// Per-call options for an LLM completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallOptions {
    #[serde(default)]
    pub model: ModelSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CallOptions {
    pub fn with_model(model: ModelSelection) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }
}

/// One candidate reply in a completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage reported by the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// The request and response payloads of one LLM call, exactly as sent and
/// received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawExchange {
    pub request: serde_json::Value,
    pub response: serde_json::Value,
}

/// Structured result of a successful completion call.
///
/// A `Completion` returned by an `LlmClient` always carries at least one
/// choice; clients report an empty choice list as
/// [`LlmError::EmptyCompletion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub exchange: RawExchange,
}

impl Completion {
    /// The message of the first choice, if any.
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|c| &c.message)
    }
}

/// Errors from LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The endpoint answered with a non-2xx status.
    #[error("upstream call failed: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Network failure, timeout, or an unreadable response stream.
    #[error("upstream call failed: {0}")]
    Transport(String),

    #[error("empty or malformed completion: no choices returned")]
    EmptyCompletion,

    #[error("empty or malformed completion: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Whether the call reached the endpoint but the body had the wrong shape.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            LlmError::EmptyCompletion | LlmError::MalformedResponse(_)
        )
    }
}
