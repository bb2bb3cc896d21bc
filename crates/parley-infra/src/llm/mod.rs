//! LLM client implementations.
//!
//! Contains the concrete [`LlmClient`](parley_core::llm::client::LlmClient)
//! for OpenAI-compatible chat-completion endpoints.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatClient;
