use thiserror::Error;

use crate::llm::LlmError;

/// Errors from record store operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("store serialization error: {0}")]
    Serialization(String),
}

/// Errors from loading a named prompt resource.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt '{0}' not found")]
    NotFound(String),

    #[error("failed to read prompt '{name}': {message}")]
    Read { name: String, message: String },

    #[error("prompt '{0}' is empty")]
    Empty(String),
}

/// Errors raised while building clients from configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing LLM API key (set llm.api_key or PARLEY_API_KEY)")]
    MissingApiKey,

    #[error("missing LLM model (set llm.model or PARLEY_MODEL)")]
    MissingModel,

    #[error("missing LLM endpoint (set llm.base_url or PARLEY_BASE_URL)")]
    MissingBaseUrl,

    #[error("invalid LLM endpoint '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Coarse classification of conversation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected before any mutation.
    Validation,
    /// The LLM call failed or returned an unusable body.
    Upstream,
    /// A store could not be read or written.
    Storage,
    /// Missing or invalid startup configuration.
    Configuration,
}

/// Errors from conversation orchestration.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("LLM call failed: {0}")]
    LlmCallFailed(#[source] LlmError),

    #[error("invalid LLM response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ConversationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversationError::Validation(_) => ErrorKind::Validation,
            ConversationError::LlmCallFailed(_) | ConversationError::InvalidResponse(_) => {
                ErrorKind::Upstream
            }
            ConversationError::Storage(_) => ErrorKind::Storage,
            ConversationError::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

impl From<LlmError> for ConversationError {
    /// Shape failures become `InvalidResponse`; everything else is a failed call.
    fn from(err: LlmError) -> Self {
        if err.is_shape_error() {
            ConversationError::InvalidResponse(err.to_string())
        } else {
            ConversationError::LlmCallFailed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Io {
            path: "/tmp/messages.json".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "store I/O error at /tmp/messages.json: permission denied"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConversationError::Validation("content required".to_string());
        assert_eq!(err.to_string(), "validation error: content required");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_llm_error_conversion_splits_shape_errors() {
        let shape: ConversationError = LlmError::EmptyCompletion.into();
        assert!(matches!(shape, ConversationError::InvalidResponse(_)));
        assert!(shape.to_string().starts_with("invalid LLM response"));

        let transport: ConversationError = LlmError::Transport("timed out".into()).into();
        assert!(matches!(transport, ConversationError::LlmCallFailed(_)));
        assert_eq!(transport.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_storage_and_config_kinds() {
        let storage: ConversationError = StoreError::Serialization("eof".into()).into();
        assert_eq!(storage.kind(), ErrorKind::Storage);
        let config: ConversationError = ConfigError::MissingApiKey.into();
        assert_eq!(config.kind(), ErrorKind::Configuration);
    }
}
