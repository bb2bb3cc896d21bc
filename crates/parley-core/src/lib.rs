//! Conversation orchestration and trait definitions for Parley.
//!
//! This crate defines the "ports" (store, LLM client and prompt traits) that
//! the infrastructure layer implements, plus the `ConversationService` that
//! drives them. It depends only on `parley-types` -- never on `parley-infra`
//! or any file/network crate.

pub mod conversation;
pub mod llm;
pub mod prompt;
pub mod store;
