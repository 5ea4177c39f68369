// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use solace_config::model::StorageConfig;
use solace_core::{
    AdapterType, DailyQuota, HealthStatus, Message, Mode, PluginAdapter, Session, SolaceError,
    StorageAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, SolaceError> {
        self.db.get().ok_or_else(|| SolaceError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), SolaceError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        let db = match self.db() {
            Ok(db) => db,
            Err(_) => return Ok(HealthStatus::Unhealthy("not initialized".into())),
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), SolaceError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SolaceError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SolaceError> {
        Self::checkpoint(self.db()?).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Session operations ---

    async fn create_session(&self, session: &Session) -> Result<(), SolaceError> {
        queries::sessions::create_session(self.db()?, session).await
    }

    async fn get_session(&self, id: &str, user_id: &str) -> Result<Option<Session>, SolaceError> {
        queries::sessions::get_session(self.db()?, id, user_id).await
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<Session>, SolaceError> {
        queries::sessions::list_sessions(self.db()?, user_id).await
    }

    // --- Message operations ---

    async fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, SolaceError> {
        queries::messages::get_messages_for_session(self.db()?, session_id, limit).await
    }

    async fn record_exchange(
        &self,
        user_message: &Message,
        assistant_message: &Message,
        new_title: Option<&str>,
        quota: &DailyQuota,
    ) -> Result<i64, SolaceError> {
        queries::messages::record_exchange(
            self.db()?,
            user_message,
            assistant_message,
            new_title,
            quota,
        )
        .await
    }

    // --- Usage ---

    async fn count_user_messages_since(
        &self,
        user_id: &str,
        since: &str,
    ) -> Result<i64, SolaceError> {
        queries::usage::count_user_messages_since(self.db()?, user_id, since).await
    }

    async fn count_user_messages(&self, user_id: &str) -> Result<i64, SolaceError> {
        queries::usage::count_user_messages(self.db()?, user_id).await
    }

    async fn count_sessions_by_mode(
        &self,
        user_id: &str,
    ) -> Result<Vec<(Mode, i64)>, SolaceError> {
        queries::usage::count_sessions_by_mode(self.db()?, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn operations_before_initialize_fail() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(
            dir.path().join("never.db").to_str().unwrap(),
        ));

        assert!(storage.list_sessions("u").await.is_err());
        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn double_initialize_is_an_error() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(
            dir.path().join("twice.db").to_str().unwrap(),
        ));
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }
}
