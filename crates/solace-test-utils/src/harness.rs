// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the chat stack with a mock provider, a temp
//! SQLite database and a JWT verifier sharing a known secret.

use std::sync::Arc;

use solace_chat::ChatService;
use solace_config::model::{AuthConfig, ChatConfig, ServerConfig, SolaceConfig, StorageConfig};
use solace_core::{SolaceError, StorageAdapter};
use solace_gateway::{Claims, GatewayState, HealthState, JwtVerifier, sign_token};
use solace_storage::SqliteStorage;

use crate::mock_provider::MockProvider;

/// Secret used to sign and verify tokens in tests.
pub const TEST_JWT_SECRET: &str = "test-secret-test-secret-test-secret!";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    chat: ChatConfig,
    server: ServerConfig,
    prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            chat: ChatConfig::default(),
            server: ServerConfig::default(),
            prometheus_render: None,
        }
    }

    /// Set mock provider replies.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_daily_limit(mut self, limit: u32) -> Self {
        self.chat.daily_message_limit = limit;
        self
    }

    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.chat.history_limit = limit;
        self
    }

    pub fn with_chat_config(mut self, chat: ChatConfig) -> Self {
        self.chat = chat;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.server.request_timeout_secs = secs;
        self
    }

    /// Serve `/metrics` with the given renderer.
    pub fn with_metrics(mut self, render: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        self.prometheus_render = Some(render);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SolaceError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SolaceError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let config = SolaceConfig {
            auth: AuthConfig {
                jwt_secret: Some(TEST_JWT_SECRET.to_string()),
                ..AuthConfig::default()
            },
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().to_string(),
                wal_mode: true,
            },
            chat: self.chat,
            server: self.server,
            ..SolaceConfig::default()
        };

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let mock_provider = if self.responses.is_empty() {
            MockProvider::new()
        } else {
            MockProvider::with_responses(self.responses)
        };

        let chat = ChatService::from_config(
            Arc::clone(&storage),
            Arc::new(mock_provider.clone()),
            &config,
        );
        let verifier = Arc::new(JwtVerifier::new(&config.auth));

        Ok(TestHarness {
            mock_provider,
            storage,
            chat,
            verifier,
            prometheus_render: self.prometheus_render,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock provider and temp storage.
pub struct TestHarness {
    /// The mock LLM provider (shares its queue with the one inside `chat`).
    pub mock_provider: MockProvider,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    pub chat: ChatService,
    pub verifier: Arc<JwtVerifier>,
    prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
    pub config: SolaceConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default settings.
    pub async fn new() -> Result<Self, SolaceError> {
        Self::builder().build().await
    }

    /// A valid one-hour token for `user_id`.
    pub fn token_for(&self, user_id: &str) -> String {
        self.token_with(user_id, 3600)
    }

    /// A token for `user_id` expiring `ttl_secs` from now (negative for past).
    pub fn token_with(&self, user_id: &str, ttl_secs: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + ttl_secs,
            iat: Some(now),
            aud: self
                .config
                .auth
                .audience
                .clone()
                .map(solace_gateway::Audience::One),
            email: Some(format!("{user_id}@example.com")),
            role: Some("authenticated".to_string()),
        };
        sign_token(TEST_JWT_SECRET.as_bytes(), &claims).unwrap_or_default()
    }

    pub fn gateway_state(&self) -> GatewayState {
        GatewayState {
            chat: self.chat.clone(),
            verifier: Arc::clone(&self.verifier),
            health: HealthState::new(self.prometheus_render.clone()),
        }
    }

    /// The full axum router over this harness.
    pub fn router(&self) -> axum::Router {
        solace_gateway::router(self.gateway_state(), &self.config.server)
    }
}
