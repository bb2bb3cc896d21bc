//! Configuration types for Parley.
//!
//! `ParleyConfig` represents the top-level `config.toml` in the data
//! directory. Every section has defaults, so an empty file is valid; the LLM
//! credentials are checked separately by [`LlmSettings::validate`] when the
//! client is built.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub conversation: ConversationSettings,
}

/// Connection settings for the chat-completion endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Usually supplied through `PARLEY_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Primary model identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Optional secondary model, selectable per call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: None,
            additional_model: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// The API key never appears in Debug output.
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("additional_model", &self.additional_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LlmSettings {
    /// Check that everything needed to reach the endpoint is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(ConfigError::MissingApiKey);
        }
        if self.model.as_deref().is_none_or(|m| m.trim().is_empty()) {
            return Err(ConfigError::MissingModel);
        }
        Ok(())
    }
}

/// Where and whether records are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Message store file name, relative to the data directory.
    #[serde(default = "default_messages_file")]
    pub messages_file: String,

    /// Request log file name, relative to the data directory.
    #[serde(default = "default_requests_file")]
    pub requests_file: String,

    /// Record raw request/response pairs of every LLM call.
    #[serde(default = "default_true")]
    pub request_log: bool,
}

fn default_messages_file() -> String {
    "messages.json".to_string()
}

fn default_requests_file() -> String {
    "requests.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            messages_file: default_messages_file(),
            requests_file: default_requests_file(),
            request_log: true,
        }
    }
}

/// Context-building settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationSettings {
    /// Number of most recent turns sent as history. `None` sends all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,

    /// Directory holding `system.md`, `welcome.md` and other prompts.
    /// Defaults to `{data_dir}/prompts`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts_dir: Option<PathBuf>,
}
