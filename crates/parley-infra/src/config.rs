//! Configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` by default) and
//! deserializes it into [`ParleyConfig`], falling back to defaults when the
//! file is missing or malformed. `PARLEY_*` environment variables are then
//! layered on top.

use std::path::Path;

use parley_types::config::ParleyConfig;

pub const API_KEY_ENV: &str = "PARLEY_API_KEY";
pub const BASE_URL_ENV: &str = "PARLEY_BASE_URL";
pub const MODEL_ENV: &str = "PARLEY_MODEL";
pub const ADDITIONAL_MODEL_ENV: &str = "PARLEY_ADDITIONAL_MODEL";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ParleyConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_config_file(data_dir: &Path) -> ParleyConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
    };

    match toml::from_str::<ParleyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ParleyConfig::default()
        }
    }
}

/// Apply `PARLEY_*` overrides. `lookup` returns the variable's value, if any;
/// blank values are ignored.
pub fn apply_env_overrides(
    mut config: ParleyConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ParleyConfig {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(API_KEY_ENV) {
        config.llm.api_key = Some(key);
    }
    if let Some(url) = get(BASE_URL_ENV) {
        config.llm.base_url = url;
    }
    if let Some(model) = get(MODEL_ENV) {
        config.llm.model = Some(model);
    }
    if let Some(model) = get(ADDITIONAL_MODEL_ENV) {
        config.llm.additional_model = Some(model);
    }
    config
}

/// Load `config.toml` and layer the process environment over it.
pub async fn load_config(data_dir: &Path) -> ParleyConfig {
    let config = load_config_file(data_dir).await;
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert!(config.llm.model.is_none());
        assert!(config.storage.request_log);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[llm]
base_url = "http://localhost:8080/v1"
model = "local-model"
max_tokens = 512

[conversation]
history_limit = 10
"#,
        )
        .await
        .unwrap();

        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
        assert_eq!(config.llm.model.as_deref(), Some("local-model"));
        assert_eq!(config.llm.max_tokens, Some(512));
        assert_eq!(config.conversation.history_limit, Some(10));
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config_file(tmp.path()).await;
        assert!(config.llm.model.is_none());
        assert_eq!(config.storage.messages_file, "messages.json");
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = ParleyConfig::default();
        config.llm.model = Some("from-file".to_string());

        let env: HashMap<&str, &str> = HashMap::from([
            (API_KEY_ENV, "sk-env"),
            (BASE_URL_ENV, "http://proxy.local/v1"),
            (MODEL_ENV, "from-env"),
            (ADDITIONAL_MODEL_ENV, "backup"),
        ]);
        let config = apply_env_overrides(config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.llm.base_url, "http://proxy.local/v1");
        assert_eq!(config.llm.model.as_deref(), Some("from-env"));
        assert_eq!(config.llm.additional_model.as_deref(), Some("backup"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = ParleyConfig::default();
        config.llm.model = Some("from-file".to_string());

        let config = apply_env_overrides(config, |name| {
            (name == MODEL_ENV).then(|| "   ".to_string())
        });
        assert_eq!(config.llm.model.as_deref(), Some("from-file"));
    }
}
