//! Conversation context assembly.
//!
//! The context sent to the LLM is rebuilt from the message store on every
//! call and never persisted:
//!
//! ```text
//! [system prompt?] + [prior turns, oldest first] + [new turn]
//! ```

use parley_types::llm::ChatMessage;
use parley_types::turn::Turn;

/// Build the message list for one LLM call.
///
/// `history` is the chronological store read; only turns older than
/// `new_turn` count as prior turns, so the new turn appears exactly once, last.
/// `limit` keeps the most recent prior turns (`None` or `Some(0)` keeps all).
pub fn assemble_context(
    system_prompt: Option<&str>,
    history: &[Turn],
    new_turn: &Turn,
    limit: Option<usize>,
) -> Vec<ChatMessage> {
    let prior: Vec<&Turn> = history.iter().filter(|t| t.id < new_turn.id).collect();
    let skip = match limit.filter(|n| *n > 0) {
        Some(n) => prior.len().saturating_sub(n),
        None => 0,
    };

    let mut messages = Vec::with_capacity(prior.len() - skip + 2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage::system(system));
    }
    messages.extend(prior[skip..].iter().map(|t| t.to_message()));
    messages.push(new_turn.to_message());
    messages
}
