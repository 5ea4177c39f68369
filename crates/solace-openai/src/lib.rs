// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible provider adapter for the Solace chat service.
//!
//! This crate implements [`ProviderAdapter`] on top of the chat-completions
//! endpoint. Any server speaking the same wire format can be targeted via
//! `openai.base_url`.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use solace_config::model::OpenAiConfig;
use solace_core::error::SolaceError;
use solace_core::traits::{PluginAdapter, ProviderAdapter};
use solace_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use tracing::{debug, info};

use crate::client::ChatCompletionsClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// Environment variable consulted when `openai.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat-completions provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: ChatCompletionsClient,
    default_model: String,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` configuration section.
    pub fn new(config: &OpenAiConfig) -> Result<Self, SolaceError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = ChatCompletionsClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?;

        info!(
            model = %config.model,
            endpoint = client.endpoint(),
            "OpenAI provider initialized"
        );

        Ok(Self {
            client,
            default_model: config.model.clone(),
        })
    }

    /// Converts a [`ProviderRequest`] into the wire request. The system
    /// prompt, when present, becomes the first message.
    fn to_completion_request(&self, request: &ProviderRequest) -> ChatCompletionRequest {
        let system = request.system_prompt.iter().map(|prompt| ApiMessage {
            role: "system".into(),
            content: prompt.clone(),
        });
        let turns = request.messages.iter().map(|m| ApiMessage {
            role: m.role.clone(),
            content: m.content.clone(),
        });

        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        ChatCompletionRequest {
            model,
            messages: system.chain(turns).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        // No API call here: health checks must not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, SolaceError> {
        let api_request = self.to_completion_request(&request);
        let response = self.client.complete(&api_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SolaceError::Provider {
                message: "OpenAI API returned no choices".into(),
                source: None,
            })?;

        let content = choice
            .message
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| SolaceError::Provider {
                message: format!(
                    "OpenAI API returned an empty reply (finish_reason: {})",
                    choice.finish_reason.as_deref().unwrap_or("none")
                ),
                source: None,
            })?;

        let usage = response.usage.unwrap_or_default();
        Ok(ProviderResponse {
            id: response.id,
            content,
            model: if response.model.is_empty() {
                api_request.model
            } else {
                response.model
            },
            finish_reason: choice.finish_reason,
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            },
        })
    }
}

/// Resolves the API key from config or the environment.
pub fn resolve_api_key(config_key: &Option<String>) -> Result<String, SolaceError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            SolaceError::Config(format!(
                "OpenAI API key not found. Set openai.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use solace_core::types::ChatMessage;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("sk-test".into()),
            base_url: base_url.to_string(),
            ..OpenAiConfig::default()
        }
    }

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: String::new(),
            system_prompt: Some("You are gentle.".into()),
            messages: vec![
                ChatMessage::user("first"),
                ChatMessage {
                    role: "assistant".into(),
                    content: "reply".into(),
                },
                ChatMessage::user("second"),
            ],
            max_tokens: 64,
            temperature: 0.7,
        }
    }

    #[test]
    fn resolve_api_key_from_config() {
        assert_eq!(resolve_api_key(&Some("sk-test-123".into())).unwrap(), "sk-test-123");
    }

    #[test]
    #[serial]
    fn resolve_api_key_falls_back_to_env() {
        // SAFETY: serialized with the other env-touching tests in this crate.
        unsafe { std::env::set_var(API_KEY_ENV, "sk-from-env") };
        assert_eq!(resolve_api_key(&Some(String::new())).unwrap(), "sk-from-env");
        assert_eq!(resolve_api_key(&None).unwrap(), "sk-from-env");
        unsafe { std::env::remove_var(API_KEY_ENV) };
    }

    #[test]
    #[serial]
    fn missing_api_key_is_a_config_error() {
        unsafe { std::env::remove_var(API_KEY_ENV) };
        let err = resolve_api_key(&None).unwrap_err();
        assert!(matches!(err, SolaceError::Config(_)));
        assert!(err.to_string().contains("API key not found"));
    }

    #[test]
    fn system_prompt_is_sent_first_and_default_model_fills_in() {
        let provider = OpenAiProvider::new(&config("http://localhost:1")).unwrap();
        let wire = provider.to_completion_request(&request());
        assert_eq!(wire.model, "gpt-4o-mini");
        let roles: Vec<&str> = wire.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(wire.messages[0].content, "You are gentle.");
    }

    #[tokio::test]
    async fn complete_maps_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "system", "content": "You are gentle."}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "That sounds hard."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&config(&server.uri())).unwrap();
        let response = provider.complete(request()).await.unwrap();
        assert_eq!(response.id, "chatcmpl-1");
        assert_eq!(response.content, "That sounds hard.");
        assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            response.usage,
            TokenUsage {
                prompt_tokens: 42,
                completion_tokens: 7
            }
        );
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-2", "model": "gpt-4o-mini", "choices": []
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&config(&server.uri())).unwrap();
        let err = provider.complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("no choices"), "got: {err}");
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn null_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-3",
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": null},
                    "finish_reason": "content_filter"
                }]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&config(&server.uri())).unwrap();
        let err = provider.complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("empty reply"), "got: {err}");
        assert!(err.to_string().contains("content_filter"), "got: {err}");
    }
}
