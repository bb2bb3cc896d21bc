//! Conversation orchestration: context assembly and the turn service.

pub mod context;
pub mod service;

pub use service::{ConversationService, TurnOptions};
