//! Conversation service orchestrating turns, context, and LLM calls.
//!
//! `ConversationService` owns no persistent state. It borrows the message
//! store and the optional request store, builds the context for each call,
//! invokes the LLM client and records both sides of the exchange.

use std::sync::Arc;

use parley_types::error::ConversationError;
use parley_types::llm::{CallOptions, ChatMessage, Completion, MessageRole, RawExchange};
use parley_types::request_log::{NewRequestLog, RequestLogEntry};
use parley_types::turn::{NewTurn, Turn};
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use super::context::assemble_context;
use crate::llm::client::LlmClient;
use crate::prompt::{PromptSource, SYSTEM_PROMPT, WELCOME_PROMPT};
use crate::store::{MessageStore, RecordStore, RequestStore};

/// Options for a single [`ConversationService::process_turn_with`] call.
#[derive(Debug, Clone)]
pub struct TurnOptions {
    /// Role of the incoming turn.
    pub role: MessageRole,
    /// Model selection and sampling overrides for the LLM call.
    pub call: CallOptions,
    /// Name of the prompt used as the system message.
    pub prompt: String,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            role: MessageRole::User,
            call: CallOptions::default(),
            prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Orchestrates the conversation over a message store and an LLM client.
///
/// Generic over the store, client and prompt traits to maintain clean
/// architecture (parley-core never depends on parley-infra).
pub struct ConversationService<M, R, L, P>
where
    M: MessageStore,
    R: RequestStore + 'static,
    L: LlmClient,
    P: PromptSource,
{
    messages: Arc<M>,
    requests: Option<Arc<R>>,
    llm: L,
    prompts: P,
    history_limit: Option<usize>,
    request_log_tasks: TaskTracker,
}

impl<M, R, L, P> ConversationService<M, R, L, P>
where
    M: MessageStore,
    R: RequestStore + 'static,
    L: LlmClient,
    P: PromptSource,
{
    /// Create a service. Pass `None` for `requests` to disable request logging.
    pub fn new(messages: Arc<M>, requests: Option<Arc<R>>, llm: L, prompts: P) -> Self {
        Self {
            messages,
            requests,
            llm,
            prompts,
            history_limit: None,
            request_log_tasks: TaskTracker::new(),
        }
    }

    /// Bound the number of prior turns sent with each call.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit.filter(|n| *n > 0);
        self
    }

    /// Access the message store.
    pub fn message_store(&self) -> &M {
        &self.messages
    }

    /// Access the request store, if request logging is enabled.
    pub fn request_store(&self) -> Option<&R> {
        self.requests.as_deref()
    }

    // --- Turns ---

    /// Process a new turn with default options and the given role.
    pub async fn process_turn(
        &self,
        content: impl Into<String>,
        role: MessageRole,
    ) -> Result<Turn, ConversationError> {
        let options = TurnOptions {
            role,
            ..Default::default()
        };
        self.process_turn_with(content, &options).await
    }

    /// Store the turn, ask the LLM for a reply, store the reply.
    ///
    /// The incoming turn is persisted before the LLM call and is not rolled
    /// back when the call or reply extraction fails.
    #[tracing::instrument(name = "process_turn", skip(self, content, options), fields(role = %options.role))]
    pub async fn process_turn_with(
        &self,
        content: impl Into<String>,
        options: &TurnOptions,
    ) -> Result<Turn, ConversationError> {
        let content = content.into();
        validate_content(&content)?;

        let new_turn = self
            .messages
            .append(NewTurn::new(options.role, content))
            .await?;
        debug!(turn_id = new_turn.id, "Incoming turn stored");

        let context = self.build_context(&new_turn, &options.prompt).await?;

        let completion = self
            .llm
            .call(&context, &options.call)
            .await
            .map_err(|e| {
                warn!(turn_id = new_turn.id, error = %e, "LLM call failed");
                ConversationError::from(e)
            })?;

        self.log_request(&new_turn.content, completion.exchange.clone());

        let reply = extract_reply(&completion)?;
        let assistant_turn = self.messages.append(NewTurn::assistant(reply)).await?;
        info!(
            turn_id = assistant_turn.id,
            model = completion.model.as_deref().unwrap_or("unknown"),
            "Assistant turn stored"
        );

        Ok(assistant_turn)
    }

    /// Append a turn directly, bypassing the LLM (externally sourced messages).
    pub async fn add_raw_turn(&self, draft: NewTurn) -> Result<Turn, ConversationError> {
        validate_content(&draft.content)?;
        let turn = self.messages.append(draft).await?;
        debug!(turn_id = turn.id, role = %turn.role, "Raw turn stored");
        Ok(turn)
    }

    /// All turns (or the `limit` most recent), oldest first.
    pub async fn get_all_turns(&self, limit: Option<usize>) -> Result<Vec<Turn>, ConversationError> {
        Ok(self.messages.read(limit, false).await?)
    }

    /// Request log entries, newest first. Empty when request logging is off.
    pub async fn get_request_log(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<RequestLogEntry>, ConversationError> {
        match &self.requests {
            Some(requests) => Ok(requests.read(limit, true).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Clear both stores and seed the history with the welcome message.
    ///
    /// A missing welcome prompt or a failed welcome write does not fail the
    /// reset; the (then empty) turn list is returned instead.
    pub async fn reset_conversation(&self) -> Result<Vec<Turn>, ConversationError> {
        self.flush_request_log().await;

        match &self.requests {
            Some(requests) => {
                tokio::try_join!(self.messages.clear(), requests.clear())?;
            }
            None => self.messages.clear().await?,
        }
        info!("Conversation reset");

        match self.prompts.load(WELCOME_PROMPT).await {
            Ok(welcome) => {
                if let Err(e) = self.messages.append(NewTurn::assistant(welcome)).await {
                    warn!(error = %e, "Failed to store welcome turn");
                }
            }
            Err(e) => warn!(error = %e, "Welcome prompt unavailable"),
        }

        Ok(self.messages.read(None, false).await?)
    }

    /// Wait until every background request-log write has finished.
    pub async fn flush_request_log(&self) {
        self.request_log_tasks.close();
        self.request_log_tasks.wait().await;
        self.request_log_tasks.reopen();
    }

    // --- Internals ---

    async fn build_context(
        &self,
        new_turn: &Turn,
        prompt: &str,
    ) -> Result<Vec<ChatMessage>, ConversationError> {
        // One extra slot for the new turn, which the read includes.
        let read_limit = self.history_limit.map(|n| n + 1);
        let history = self.messages.read(read_limit, false).await?;

        let system_prompt = match self.prompts.load(prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(prompt, error = %e, "System prompt unavailable, continuing without it");
                None
            }
        };

        Ok(assemble_context(
            system_prompt.as_deref(),
            &history,
            new_turn,
            self.history_limit,
        ))
    }

    fn log_request(&self, trigger: &str, exchange: RawExchange) {
        let Some(requests) = self.requests.clone() else {
            return;
        };
        let draft = NewRequestLog::from_exchange(trigger, exchange);

        self.request_log_tasks.spawn(async move {
            match requests.append(draft).await {
                Ok(entry) => debug!(entry_id = entry.id, title = %entry.title, "Request logged"),
                Err(e) => warn!(error = %e, "Failed to write request log entry"),
            }
        });
    }
}

fn validate_content(content: &str) -> Result<(), ConversationError> {
    if content.trim().is_empty() {
        return Err(ConversationError::Validation("content required".to_string()));
    }
    Ok(())
}

fn extract_reply(completion: &Completion) -> Result<String, ConversationError> {
    let message = completion.first_message().ok_or_else(|| {
        ConversationError::InvalidResponse("completion has no choices".to_string())
    })?;
    if message.content.trim().is_empty() {
        return Err(ConversationError::InvalidResponse(
            "first choice has empty content".to_string(),
        ));
    }
    Ok(message.content.clone())
}
