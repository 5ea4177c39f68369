// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for session and message persistence.

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{DailyQuota, Message, Mode, Session};

/// Adapter for storage and persistence backends.
///
/// Every session-scoped read takes the owning `user_id` so that ownership is
/// checked by the query itself, never by the caller after the fact.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), SolaceError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), SolaceError>;

    // --- Sessions ---

    /// Persists a new session.
    async fn create_session(&self, session: &Session) -> Result<(), SolaceError>;

    /// Loads a session only if it is owned by `user_id`.
    async fn get_session(&self, id: &str, user_id: &str) -> Result<Option<Session>, SolaceError>;

    /// Lists a user's sessions, newest first.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<Session>, SolaceError>;

    // --- Messages ---

    /// Messages of a session in chronological order. With `limit`, only the
    /// most recent `limit` messages are returned (still oldest first).
    async fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, SolaceError>;

    /// Atomically stores a user/assistant exchange and bumps the session's
    /// message count. `new_title` replaces the title only while it is still
    /// the mode default.
    ///
    /// The user's messages since `quota.since` are recounted inside the same
    /// write transaction; at `quota.limit` nothing is stored and
    /// [`SolaceError::RateLimited`] is returned. On success, returns that
    /// count including the new message.
    async fn record_exchange(
        &self,
        user_message: &Message,
        assistant_message: &Message,
        new_title: Option<&str>,
        quota: &DailyQuota,
    ) -> Result<i64, SolaceError>;

    // --- Usage ---

    /// Number of user-authored messages created at or after `since`.
    async fn count_user_messages_since(
        &self,
        user_id: &str,
        since: &str,
    ) -> Result<i64, SolaceError>;

    /// Total user-authored messages.
    async fn count_user_messages(&self, user_id: &str) -> Result<i64, SolaceError>;

    /// Session counts grouped by mode. Modes without sessions are absent.
    async fn count_sessions_by_mode(&self, user_id: &str)
    -> Result<Vec<(Mode, i64)>, SolaceError>;
}
