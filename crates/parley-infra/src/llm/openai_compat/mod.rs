//! OpenAI-compatible chat completion client.
//!
//! Sends `POST {base_url}/chat/completions` with bearer authentication and
//! maps the response into a [`Completion`]. The exact request and response
//! JSON travel with the result as a [`RawExchange`] so callers can keep a
//! request log without the client knowing about it.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{Instrument, Span};

use parley_core::llm::client::LlmClient;
use parley_observe::genai_attrs::{
    GEN_AI_RESPONSE_ID, GEN_AI_RESPONSE_MODEL, GEN_AI_USAGE_INPUT_TOKENS,
    GEN_AI_USAGE_OUTPUT_TOKENS, OP_CHAT, PROVIDER_OPENAI_COMPATIBLE,
};
use parley_types::config::LlmSettings;
use parley_types::error::ConfigError;
use parley_types::llm::{
    CallOptions, ChatMessage, Choice, Completion, LlmError, MessageRole, ModelSelection,
    RawExchange,
};

use self::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Client for any endpoint speaking the OpenAI chat completions protocol.
///
/// Does NOT derive Debug, so the key cannot leak through formatting.
pub struct OpenAiCompatClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    additional_model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl OpenAiCompatClient {
    /// Build a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the endpoint, key or model is missing or
    /// invalid, or the HTTP client cannot be constructed.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let api_key = settings
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey)?;
        let model = settings.model.clone().ok_or(ConfigError::MissingModel)?;

        Ok(Self {
            client,
            api_key: SecretString::from(api_key),
            base_url: settings.base_url.trim().trim_end_matches('/').to_string(),
            model,
            additional_model: settings
                .additional_model
                .clone()
                .filter(|m| !m.trim().is_empty()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    /// The primary model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Map a selection to a concrete model identifier.
    ///
    /// `Additional` falls back to the primary model when no additional model
    /// is configured.
    pub fn resolve_model<'a>(&'a self, selection: &'a ModelSelection) -> &'a str {
        match selection {
            ModelSelection::Primary => &self.model,
            ModelSelection::Additional => self.additional_model.as_deref().unwrap_or(&self.model),
            ModelSelection::Named(name) => name,
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Per-call options win over configured defaults.
    fn build_request(&self, messages: &[ChatMessage], options: &CallOptions) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.resolve_model(&options.model).to_string(),
            messages: messages.to_vec(),
            temperature: options.temperature.or(self.temperature),
            max_tokens: options.max_tokens.or(self.max_tokens),
        }
    }

    async fn send(&self, request: ChatCompletionRequest) -> Result<Completion, LlmError> {
        let request_json = serde_json::to_value(&request)
            .map_err(|e| LlmError::Transport(format!("failed to encode request: {e}")))?;

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_json)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "completion endpoint returned an error");
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: Value = serde_json::from_str(&body)
            .map_err(|e| LlmError::MalformedResponse(format!("response is not JSON: {e}")))?;

        let completion = parse_completion(request_json, response_json)?;
        record_response(&Span::current(), &completion);
        Ok(completion)
    }
}

impl LlmClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        PROVIDER_OPENAI_COMPATIBLE
    }

    async fn call(
        &self,
        messages: &[ChatMessage],
        options: &CallOptions,
    ) -> Result<Completion, LlmError> {
        let request = self.build_request(messages, options);
        let span = tracing::info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = OP_CHAT,
            gen_ai.provider.name = PROVIDER_OPENAI_COMPATIBLE,
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.max_tokens = ?request.max_tokens,
            gen_ai.response.id = tracing::field::Empty,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
        );
        self.send(request).instrument(span).await
    }
}

fn record_response(span: &Span, completion: &Completion) {
    if let Some(id) = &completion.id {
        span.record(GEN_AI_RESPONSE_ID, id.as_str());
    }
    if let Some(model) = &completion.model {
        span.record(GEN_AI_RESPONSE_MODEL, model.as_str());
    }
    if let Some(usage) = &completion.usage {
        span.record(GEN_AI_USAGE_INPUT_TOKENS, usage.prompt_tokens);
        span.record(GEN_AI_USAGE_OUTPUT_TOKENS, usage.completion_tokens);
    }
}

/// Turn a successful response body into a [`Completion`].
///
/// A body without a `choices` array, or a choice without a message, is
/// malformed; an empty `choices` array is an empty completion.
pub fn parse_completion(request: Value, response: Value) -> Result<Completion, LlmError> {
    let parsed: ChatCompletionResponse = serde_json::from_value(response.clone())
        .map_err(|e| LlmError::MalformedResponse(format!("unexpected response shape: {e}")))?;

    let wire_choices = parsed
        .choices
        .ok_or_else(|| LlmError::MalformedResponse("response has no choices field".to_string()))?;
    if wire_choices.is_empty() {
        return Err(LlmError::EmptyCompletion);
    }

    let choices = wire_choices
        .into_iter()
        .enumerate()
        .map(|(position, choice)| {
            let message = choice.message.ok_or_else(|| {
                LlmError::MalformedResponse(format!("choice {position} has no message"))
            })?;
            let role = message
                .role
                .as_deref()
                .and_then(|r| r.parse().ok())
                .unwrap_or(MessageRole::Assistant);
            Ok(Choice {
                index: choice.index.unwrap_or(position as u32),
                message: ChatMessage::new(role, message.content.unwrap_or_default()),
                finish_reason: choice.finish_reason,
            })
        })
        .collect::<Result<Vec<_>, LlmError>>()?;

    Ok(Completion {
        id: parsed.id,
        model: parsed.model,
        choices,
        usage: parsed.usage,
        exchange: RawExchange { request, response },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn settings(base_url: &str) -> LlmSettings {
        LlmSettings {
            base_url: base_url.to_string(),
            api_key: Some("sk-test".to_string()),
            model: Some("gpt-4o-mini".to_string()),
            ..Default::default()
        }
    }

    fn success_body() -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello there"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11}
        })
    }

    /// Serve exactly one HTTP request with a canned response. The handle
    /// yields the raw request text.
    async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&buf).into_owned()
        });

        (format!("http://{addr}/v1"), handle)
    }

    #[test]
    fn test_from_settings_rejects_missing_key() {
        let mut s = settings("https://api.example.com/v1");
        s.api_key = None;
        assert!(matches!(
            OpenAiCompatClient::from_settings(&s),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_name() {
        let client = OpenAiCompatClient::from_settings(&settings("https://x.test/v1")).unwrap();
        assert_eq!(client.name(), "openai_compatible");
    }

    #[test]
    fn test_resolve_model() {
        let mut s = settings("https://x.test/v1");
        let client = OpenAiCompatClient::from_settings(&s).unwrap();
        assert_eq!(client.resolve_model(&ModelSelection::Primary), "gpt-4o-mini");
        // No additional model configured: falls back to primary.
        assert_eq!(client.resolve_model(&ModelSelection::Additional), "gpt-4o-mini");
        let named = ModelSelection::Named("o3".to_string());
        assert_eq!(client.resolve_model(&named), "o3");

        s.additional_model = Some("gpt-4o".to_string());
        let client = OpenAiCompatClient::from_settings(&s).unwrap();
        assert_eq!(client.resolve_model(&ModelSelection::Additional), "gpt-4o");
    }

    #[test]
    fn test_build_request_applies_defaults_and_overrides() {
        let mut s = settings("https://x.test/v1/");
        s.temperature = Some(0.5);
        s.max_tokens = Some(256);
        let client = OpenAiCompatClient::from_settings(&s).unwrap();
        assert_eq!(client.url(), "https://x.test/v1/chat/completions");

        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let defaults = client.build_request(&messages, &CallOptions::default());
        assert_eq!(defaults.temperature, Some(0.5));
        assert_eq!(defaults.max_tokens, Some(256));

        let options = CallOptions {
            model: ModelSelection::Named("o3".to_string()),
            temperature: Some(0.0),
            max_tokens: None,
        };
        let overridden = client.build_request(&messages, &options);
        assert_eq!(overridden.model, "o3");
        assert_eq!(overridden.temperature, Some(0.0));
        assert_eq!(overridden.max_tokens, Some(256));

        let body = serde_json::to_value(&overridden).unwrap();
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_request_omits_unset_options() {
        let client = OpenAiCompatClient::from_settings(&settings("https://x.test/v1")).unwrap();
        let request = client.build_request(&[ChatMessage::user("hi")], &CallOptions::default());
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_parse_completion_success() {
        let request = json!({"model": "gpt-4o-mini"});
        let completion = parse_completion(request.clone(), success_body()).unwrap();
        assert_eq!(completion.id.as_deref(), Some("chatcmpl-1"));
        assert_eq!(completion.choices.len(), 1);
        assert_eq!(completion.first_message().unwrap(), &ChatMessage::assistant("Hello there"));
        assert_eq!(completion.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(completion.usage.as_ref().unwrap().total_tokens, 11);
        assert_eq!(completion.exchange.request, request);
        assert_eq!(completion.exchange.response, success_body());
    }

    #[test]
    fn test_parse_completion_null_content_is_empty_string() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": null}}]});
        let completion = parse_completion(json!({}), body).unwrap();
        assert_eq!(completion.choices[0].message.content, "");
        assert_eq!(completion.choices[0].index, 0);
    }

    #[test]
    fn test_parse_completion_empty_choices() {
        let err = parse_completion(json!({}), json!({"choices": []})).unwrap_err();
        assert!(matches!(err, LlmError::EmptyCompletion));
    }

    #[test]
    fn test_parse_completion_missing_choices_or_message() {
        let err = parse_completion(json!({}), json!({"id": "x"})).unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));

        let err = parse_completion(json!({}), json!({"choices": [{"index": 0}]})).unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));

        let err = parse_completion(json!({}), json!({"choices": "nope"})).unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_call_success_sends_bearer_and_body() {
        let (base_url, server) = serve_once("200 OK", success_body().to_string()).await;
        let client = OpenAiCompatClient::from_settings(&settings(&base_url)).unwrap();

        let messages = vec![ChatMessage::user("hi")];
        let completion = client.call(&messages, &CallOptions::default()).await.unwrap();
        assert_eq!(completion.first_message().unwrap().content, "Hello there");
        assert_eq!(completion.exchange.request["model"], "gpt-4o-mini");
        assert_eq!(completion.exchange.request["messages"][0]["content"], "hi");
        assert_eq!(completion.exchange.response, success_body());

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /v1/chat/completions"));
        assert!(raw.to_lowercase().contains("authorization: bearer sk-test"));
        assert!(raw.contains("\"model\":\"gpt-4o-mini\""));
    }

    #[tokio::test]
    async fn test_call_non_success_status_is_upstream_error() {
        let (base_url, server) =
            serve_once("500 Internal Server Error", r#"{"error":"boom"}"#.to_string()).await;
        let client = OpenAiCompatClient::from_settings(&settings(&base_url)).unwrap();

        let err = client
            .call(&[ChatMessage::user("hi")], &CallOptions::default())
            .await
            .unwrap_err();
        match err {
            LlmError::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_call_empty_choices() {
        let (base_url, server) = serve_once("200 OK", r#"{"choices":[]}"#.to_string()).await;
        let client = OpenAiCompatClient::from_settings(&settings(&base_url)).unwrap();

        let err = client
            .call(&[ChatMessage::user("hi")], &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyCompletion));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_call_non_json_body_is_malformed() {
        let (base_url, server) = serve_once("200 OK", "not json".to_string()).await;
        let client = OpenAiCompatClient::from_settings(&settings(&base_url)).unwrap();

        let err = client
            .call(&[ChatMessage::user("hi")], &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_call_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            OpenAiCompatClient::from_settings(&settings(&format!("http://{addr}/v1"))).unwrap();
        let err = client
            .call(&[ChatMessage::user("hi")], &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
    }
}
