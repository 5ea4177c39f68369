// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Solace service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Format used for every persisted timestamp. Fixed width, so lexical order
/// equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Render a UTC instant in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Midnight UTC of the day containing `at`, in [`TIMESTAMP_FORMAT`].
pub fn day_start(at: DateTime<Utc>) -> String {
    format!("{}T00:00:00.000Z", at.format("%Y-%m-%d"))
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Auth,
    Observability,
}

/// Conversational persona. Each mode selects a fixed system prompt.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Gentle self-reflection and emotional check-ins.
    #[default]
    Reflect,
    /// Support through setbacks, grief, and recovery.
    Recover,
    /// Rebuilding routines, confidence, and relationships.
    Rebuild,
    /// Growth, goals, and forward-looking change.
    Evolve,
}

impl Mode {
    /// Every mode, in display order.
    pub const ALL: [Mode; 4] = [Mode::Reflect, Mode::Recover, Mode::Rebuild, Mode::Evolve];

    /// Capitalized name for user-facing text ("Reflect").
    pub fn label(self) -> &'static str {
        match self {
            Mode::Reflect => "Reflect",
            Mode::Recover => "Recover",
            Mode::Rebuild => "Rebuild",
            Mode::Evolve => "Evolve",
        }
    }
}

/// Author of a persisted message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

// --- Persisted rows ---

/// A conversation thread owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub mode: Mode,
    pub message_count: i64,
    pub created_at: String,
    /// Set while the title is the mode default; the first exchange may then
    /// replace it. Never sent to clients.
    #[serde(skip)]
    pub title_is_default: bool,
}

/// A single message within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub role: Role,
    pub content: String,
    pub mode: Mode,
    /// Reserved for sentiment tagging; never populated by the service.
    pub sentiment: Option<String>,
    pub created_at: String,
}

/// Per-user daily allowance, re-checked when an exchange is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyQuota {
    /// Start of the current UTC day, see [`day_start`].
    pub since: String,
    pub limit: u32,
}

// --- Provider types ---

/// One turn in the conversation sent to the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.to_string(),
            content: msg.content.clone(),
        }
    }
}

/// A request to an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Model identifier; empty means the provider's default.
    pub model: String,
    /// System prompt, sent ahead of `messages`.
    pub system_prompt: Option<String>,
    /// Conversation turns, oldest first.
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A completed LLM response.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}

// --- Auth types ---

/// A raw bearer token taken from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Stable user id (`sub` claim).
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

// --- Request / response envelopes ---

/// Body of the `createSession` action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Body of the `sendMessage` action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub session_id: String,
    pub message: String,
    /// Overrides the session's mode for this exchange only.
    #[serde(default)]
    pub mode: Option<Mode>,
}

/// Result of the `sendMessage` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    /// The assistant's reply text.
    pub reply: String,
    pub user_message: Message,
    pub assistant_message: Message,
    /// User messages still allowed today after this one.
    pub remaining_today: u32,
}

/// Result of the `getUserStats` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_sessions: i64,
    /// Messages authored by the user (assistant replies excluded).
    pub total_messages: i64,
    pub messages_today: i64,
    pub daily_limit: u32,
    pub remaining_today: u32,
    pub sessions_by_mode: BTreeMap<Mode, i64>,
}
