//! LLM client abstraction.

pub mod client;
