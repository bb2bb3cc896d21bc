//! LlmClient trait definition.
//!
//! The client is a pure transport and shape adapter: it sends role-tagged
//! messages to a completion endpoint and returns the structured result. It
//! never interprets message semantics and never retries.

use parley_types::llm::{CallOptions, ChatMessage, Completion, LlmError};

/// Trait for chat-completion backends.
///
/// Implementations live in parley-infra (e.g., `OpenAiCompatClient`).
pub trait LlmClient: Send + Sync {
    /// Human-readable backend name (e.g., "openai_compatible").
    fn name(&self) -> &str;

    /// Send `messages` and return the completion.
    ///
    /// A returned `Completion` always has at least one choice. Zero choices
    /// or an unparseable body fail with `LlmError::EmptyCompletion` or
    /// `LlmError::MalformedResponse`; transport failures with
    /// `LlmError::Upstream` or `LlmError::Transport`.
    fn call(
        &self,
        messages: &[ChatMessage],
        options: &CallOptions,
    ) -> impl std::future::Future<Output = Result<Completion, LlmError>> + Send;
}
