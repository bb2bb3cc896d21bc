//! Infrastructure layer for Parley.
//!
//! Contains implementations of the traits defined in `parley-core`: JSON file
//! record stores, the OpenAI-compatible HTTP client and the prompt directory
//! reader, plus configuration loading and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod prompt;
pub mod store;
