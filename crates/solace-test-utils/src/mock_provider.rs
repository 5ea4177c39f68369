// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use solace_core::traits::adapter::PluginAdapter;
use solace_core::traits::provider::ProviderAdapter;
use solace_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage};
use solace_core::SolaceError;

enum Reply {
    Text(String),
    Failure(String),
}

/// A mock LLM provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Every request is recorded.
#[derive(Clone)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(responses.into_iter().map(Reply::Text).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(Reply::Text(text.into()));
    }

    /// Queue a provider error with the given message.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .await
            .push_back(Reply::Failure(message.into()));
    }

    /// Sleep for `delay` before every reply, simulating a slow upstream.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, SolaceError> {
        let model = if request.model.is_empty() {
            "mock-model".to_string()
        } else {
            request.model.clone()
        };
        self.requests.lock().await.push(request);

        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().await.pop_front();
        match reply {
            Some(Reply::Failure(message)) => Err(SolaceError::Provider {
                message,
                source: None,
            }),
            Some(Reply::Text(content)) => Ok(response(model, content)),
            None => Ok(response(model, "mock response".to_string())),
        }
    }
}

fn response(model: String, content: String) -> ProviderResponse {
    ProviderResponse {
        id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
        content,
        model,
        finish_reason: Some("stop".to_string()),
        usage: TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 20,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            system_prompt: None,
            messages: vec![],
            max_tokens: 100,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content, "mock response");
        assert_eq!(resp.model, "test-model");
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let provider = MockProvider::with_responses(vec!["first".into(), "second".into()]);
        provider.add_failure("upstream down").await;

        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(request()).await.unwrap().content, "second");
        let err = provider.complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("upstream down"));
        assert_eq!(provider.complete(request()).await.unwrap().content, "mock response");
        assert_eq!(provider.call_count().await, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_holds_the_reply() {
        let provider = MockProvider::new();
        provider.set_delay(Duration::from_secs(30)).await;

        let started = tokio::time::Instant::now();
        provider.complete(request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let provider = MockProvider::new();
        let clone = provider.clone();
        clone.add_response("shared").await;
        assert_eq!(provider.complete(request()).await.unwrap().content, "shared");
        assert_eq!(clone.requests().await.len(), 1);
    }
}
