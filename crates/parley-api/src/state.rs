//! Application state wiring the conversation service together.
//!
//! The service is generic over store, client and prompt traits; AppState pins
//! it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use parley_core::conversation::ConversationService;
use parley_infra::config::load_config;
use parley_infra::filesystem::{messages_path, prompts_dir, requests_path, resolve_data_dir};
use parley_infra::llm::OpenAiCompatClient;
use parley_infra::prompt::FilePromptSource;
use parley_infra::store::{JsonMessageStore, JsonRequestStore};
use parley_types::config::ParleyConfig;

/// Concrete conversation service pinned to infra implementations.
pub type ConcreteConversationService =
    ConversationService<JsonMessageStore, JsonRequestStore, OpenAiCompatClient, FilePromptSource>;

/// Shared application state.
pub struct AppState {
    pub conversation: Arc<ConcreteConversationService>,
    pub config: ParleyConfig,
}

/// Resolve the data directory and load the effective configuration.
pub async fn load_environment() -> anyhow::Result<(PathBuf, ParleyConfig)> {
    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    let config = load_config(&data_dir).await;
    Ok((data_dir, config))
}

impl AppState {
    /// Wire stores, client and prompts from an already loaded configuration.
    ///
    /// Fails when the LLM settings are incomplete.
    pub fn from_config(data_dir: PathBuf, config: ParleyConfig) -> anyhow::Result<Self> {
        let llm = OpenAiCompatClient::from_settings(&config.llm)
            .context("invalid LLM configuration")?;

        let messages = Arc::new(JsonMessageStore::new(messages_path(&data_dir, &config)));
        let requests = config
            .storage
            .request_log
            .then(|| Arc::new(JsonRequestStore::new(requests_path(&data_dir, &config))));
        let prompts = FilePromptSource::new(prompts_dir(&data_dir, &config));

        tracing::debug!(
            data_dir = %data_dir.display(),
            model = llm.model(),
            request_log = config.storage.request_log,
            "application state initialized"
        );

        let conversation = ConversationService::new(messages, requests, llm, prompts)
            .with_history_limit(config.conversation.history_limit);

        Ok(Self {
            conversation: Arc::new(conversation),
            config,
        })
    }
}
