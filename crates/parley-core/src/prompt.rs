//! Named prompt resources.
//!
//! Prompts (the system prompt, the welcome message, feature-specific
//! prompts) are plain text looked up by logical name. Callers must survive a
//! failed lookup.

use parley_types::error::PromptError;

/// Name of the prompt placed first in every conversation context.
pub const SYSTEM_PROMPT: &str = "system";

/// Name of the prompt stored as the first assistant turn after a reset.
pub const WELCOME_PROMPT: &str = "welcome";

/// Loader for prompt text by logical name.
pub trait PromptSource: Send + Sync {
    fn load(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<String, PromptError>> + Send;
}
