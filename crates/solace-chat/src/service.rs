// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The request-handling logic behind every chat API action.
//!
//! `send_message` runs a fixed sequence: validate, check today's count,
//! check session ownership, load history, call the provider once, then
//! persist the exchange in a single transaction. A failure at any step
//! returns immediately and nothing after it runs.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use solace_config::model::{ChatConfig, OpenAiConfig, SolaceConfig};
use solace_core::types::{
    ChatMessage, CreateSessionRequest, DailyQuota, ProviderRequest, SendMessageRequest,
    SendMessageResponse, UserStats, day_start, format_timestamp,
};
use solace_core::{Message, Mode, ProviderAdapter, Role, Session, SolaceError, StorageAdapter};
use tracing::{debug, info, warn};

use crate::prompts::system_prompt;

/// Longest stored session title, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Length of a title derived from the first message, before the ellipsis.
pub const AUTO_TITLE_CHARS: usize = 50;

/// Model parameters sent with every completion request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&OpenAiConfig> for GenerationSettings {
    fn from(config: &OpenAiConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Chat operations for authenticated users.
///
/// Cheap to clone; storage and provider are shared.
#[derive(Clone)]
pub struct ChatService {
    storage: Arc<dyn StorageAdapter>,
    provider: Arc<dyn ProviderAdapter>,
    chat: ChatConfig,
    generation: GenerationSettings,
}

impl ChatService {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        provider: Arc<dyn ProviderAdapter>,
        chat: ChatConfig,
        generation: GenerationSettings,
    ) -> Self {
        Self {
            storage,
            provider,
            chat,
            generation,
        }
    }

    /// Builds a service from the full configuration.
    pub fn from_config(
        storage: Arc<dyn StorageAdapter>,
        provider: Arc<dyn ProviderAdapter>,
        config: &SolaceConfig,
    ) -> Self {
        Self::new(
            storage,
            provider,
            config.chat.clone(),
            GenerationSettings::from(&config.openai),
        )
    }

    pub fn daily_limit(&self) -> u32 {
        self.chat.daily_message_limit
    }

    /// Creates a session. Mode defaults to Reflect and the title to
    /// `"<Mode> session"`.
    pub async fn create_session(
        &self,
        user_id: &str,
        request: CreateSessionRequest,
    ) -> Result<Session, SolaceError> {
        let mode = request.mode.unwrap_or_default();
        let chosen: Option<String> = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| t.chars().take(MAX_TITLE_CHARS).collect());
        let title_is_default = chosen.is_none();
        let title = chosen.unwrap_or_else(|| default_title(mode));

        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            mode,
            message_count: 0,
            created_at: format_timestamp(Utc::now()),
            title_is_default,
        };
        self.storage.create_session(&session).await?;

        info!(user_id, session_id = %session.id, mode = %mode, "session created");
        Ok(session)
    }

    /// Answers one user message and stores the exchange.
    pub async fn send_message(
        &self,
        user_id: &str,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, SolaceError> {
        let received_at = Utc::now();

        let text = request.message.trim();
        if text.is_empty() {
            return Err(SolaceError::InvalidRequest(
                "message must not be empty".into(),
            ));
        }
        let char_count = text.chars().count();
        if char_count > self.chat.max_message_chars {
            return Err(SolaceError::InvalidRequest(format!(
                "message is {char_count} characters, the maximum is {}",
                self.chat.max_message_chars
            )));
        }

        // Checked again when the exchange is stored; this early check spares
        // the provider call.
        let quota = DailyQuota {
            since: day_start(received_at),
            limit: self.chat.daily_message_limit,
        };
        let sent_today = self
            .storage
            .count_user_messages_since(user_id, &quota.since)
            .await?;
        if sent_today >= i64::from(quota.limit) {
            return Err(rate_limited(user_id, sent_today, quota.limit));
        }

        let session = self
            .storage
            .get_session(&request.session_id, user_id)
            .await?
            .ok_or_else(|| SolaceError::NotFound("session not found".into()))?;

        let mode = request.mode.unwrap_or(session.mode);

        let history = if self.chat.history_limit == 0 {
            Vec::new()
        } else {
            self.storage
                .get_messages(&session.id, Some(i64::from(self.chat.history_limit)))
                .await?
        };

        let mut messages: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
        messages.push(ChatMessage::user(text));

        let provider_request = ProviderRequest {
            model: self.generation.model.clone(),
            system_prompt: Some(system_prompt(mode, &self.chat.prompts).to_string()),
            messages,
            max_tokens: self.generation.max_tokens,
            temperature: self.generation.temperature,
        };

        debug!(
            session_id = %session.id,
            history = history.len(),
            mode = %mode,
            "calling provider"
        );
        let started = Instant::now();
        let response = self.provider.complete(provider_request).await;
        solace_prometheus::record_provider_latency(started.elapsed().as_secs_f64());
        let response = response.inspect_err(|e| {
            warn!(session_id = %session.id, error = %e, "provider call failed");
        })?;
        solace_prometheus::record_tokens(
            &response.model,
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
        );

        let user_message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session.id.clone(),
            user_id: user_id.to_string(),
            role: Role::User,
            content: text.to_string(),
            mode,
            sentiment: None,
            created_at: format_timestamp(received_at),
        };
        let assistant_message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session.id.clone(),
            user_id: user_id.to_string(),
            role: Role::Assistant,
            content: response.content.clone(),
            mode,
            sentiment: None,
            created_at: format_timestamp(Utc::now()),
        };

        let new_title = (session.message_count == 0 && session.title_is_default)
            .then(|| title_from_message(text));

        let sent_today = match self
            .storage
            .record_exchange(&user_message, &assistant_message, new_title.as_deref(), &quota)
            .await
        {
            Ok(sent) => sent,
            Err(SolaceError::RateLimited { limit }) => {
                return Err(rate_limited(user_id, i64::from(limit), limit));
            }
            Err(e) => return Err(e),
        };

        solace_prometheus::record_message(&mode.to_string());
        let remaining_today = remaining(quota.limit, sent_today);
        info!(
            user_id,
            session_id = %session.id,
            mode = %mode,
            remaining_today,
            "message answered"
        );

        Ok(SendMessageResponse {
            reply: response.content,
            user_message,
            assistant_message,
            remaining_today,
        })
    }

    /// The user's sessions, newest first.
    pub async fn list_sessions(&self, user_id: &str) -> Result<Vec<Session>, SolaceError> {
        self.storage.list_sessions(user_id).await
    }

    /// Every message of a session the user owns, oldest first.
    pub async fn list_messages(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<Message>, SolaceError> {
        if self.storage.get_session(session_id, user_id).await?.is_none() {
            return Err(SolaceError::NotFound("session not found".into()));
        }
        self.storage.get_messages(session_id, None).await
    }

    /// Usage summary for the stats panel.
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats, SolaceError> {
        let limit = self.chat.daily_message_limit;
        let messages_today = self
            .storage
            .count_user_messages_since(user_id, &day_start(Utc::now()))
            .await?;
        let total_messages = self.storage.count_user_messages(user_id).await?;

        let mut sessions_by_mode: BTreeMap<Mode, i64> =
            Mode::ALL.iter().map(|mode| (*mode, 0)).collect();
        for (mode, count) in self.storage.count_sessions_by_mode(user_id).await? {
            sessions_by_mode.insert(mode, count);
        }
        let total_sessions = sessions_by_mode.values().sum();

        Ok(UserStats {
            total_sessions,
            total_messages,
            messages_today,
            daily_limit: limit,
            remaining_today: remaining(limit, messages_today),
            sessions_by_mode,
        })
    }
}

fn rate_limited(user_id: &str, sent_today: i64, limit: u32) -> SolaceError {
    warn!(user_id, sent_today, limit, "daily message limit reached");
    solace_prometheus::record_rate_limited();
    SolaceError::RateLimited { limit }
}

/// Title given to a session created without one.
pub fn default_title(mode: Mode) -> String {
    format!("{} session", mode.label())
}

/// Title derived from the first message of a session.
pub fn title_from_message(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() > AUTO_TITLE_CHARS {
        let mut title: String = text.chars().take(AUTO_TITLE_CHARS).collect();
        title.push('…');
        title
    } else {
        text.to_string()
    }
}

fn remaining(limit: u32, used: i64) -> u32 {
    u32::try_from((i64::from(limit) - used).max(0)).unwrap_or(0)
}
