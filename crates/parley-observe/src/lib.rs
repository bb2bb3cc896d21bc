//! Observability for Parley: subscriber setup and the GenAI attribute
//! vocabulary used on LLM spans.

pub mod genai_attrs;
pub mod tracing_setup;
