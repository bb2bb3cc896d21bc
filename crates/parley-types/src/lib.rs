//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the workspace:
//! stored turns, request log entries, LLM wire shapes, configuration and
//! the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod record;
pub mod request_log;
pub mod turn;
