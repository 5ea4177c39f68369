// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session CRUD operations.

use rusqlite::params;
use solace_core::{Session, SolaceError};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

const SESSION_COLUMNS: &str =
    "id, user_id, title, mode, message_count, created_at, title_is_default";

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        mode: parse_column(row, 3)?,
        message_count: row.get(4)?,
        created_at: row.get(5)?,
        title_is_default: row.get(6)?,
    })
}

/// Create a new session.
pub async fn create_session(db: &Database, session: &Session) -> Result<(), SolaceError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO sessions
                     (id, user_id, title, mode, message_count, created_at, title_is_default)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session.id,
                    session.user_id,
                    session.title,
                    session.mode.to_string(),
                    session.message_count,
                    session.created_at,
                    session.title_is_default,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a session by ID, only if `user_id` owns it.
pub async fn get_session(
    db: &Database,
    id: &str,
    user_id: &str,
) -> Result<Option<Session>, SolaceError> {
    let id = id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Session>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1 AND user_id = ?2"
            ))?;
            match stmt.query_row(params![id, user_id], row_to_session) {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List a user's sessions, newest first.
pub async fn list_sessions(db: &Database, user_id: &str) -> Result<Vec<Session>, SolaceError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Session>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let sessions = stmt
                .query_map(params![user_id], row_to_session)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(sessions)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::Mode;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_session(id: &str, user_id: &str, created_at: &str) -> Session {
        Session {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Reflect session".to_string(),
            mode: Mode::Reflect,
            message_count: 0,
            created_at: created_at.to_string(),
            title_is_default: true,
        }
    }

    #[tokio::test]
    async fn create_and_get_session_roundtrips() {
        let (db, _dir) = setup_db().await;
        let mut session = make_session("sess-1", "user-1", "2026-01-01T00:00:00.000Z");
        session.mode = Mode::Rebuild;
        session.title = "Sunday planning".to_string();
        session.title_is_default = false;

        create_session(&db, &session).await.unwrap();
        let retrieved = get_session(&db, "sess-1", "user-1").await.unwrap();
        assert_eq!(retrieved, Some(session));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_session_of_another_user_returns_none() {
        let (db, _dir) = setup_db().await;
        let session = make_session("sess-1", "user-1", "2026-01-01T00:00:00.000Z");
        create_session(&db, &session).await.unwrap();

        assert!(get_session(&db, "sess-1", "user-2").await.unwrap().is_none());
        assert!(get_session(&db, "nope", "user-1").await.unwrap().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_sessions_is_scoped_and_newest_first() {
        let (db, _dir) = setup_db().await;
        create_session(&db, &make_session("a", "user-1", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        create_session(&db, &make_session("b", "user-1", "2026-01-02T00:00:00.000Z"))
            .await
            .unwrap();
        create_session(&db, &make_session("c", "user-2", "2026-01-03T00:00:00.000Z"))
            .await
            .unwrap();

        let sessions = list_sessions(&db, "user-1").await.unwrap();
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn same_timestamp_sessions_order_by_insertion() {
        let (db, _dir) = setup_db().await;
        let ts = "2026-01-01T00:00:00.000Z";
        create_session(&db, &make_session("first", "u", ts)).await.unwrap();
        create_session(&db, &make_session("second", "u", ts)).await.unwrap();

        let sessions = list_sessions(&db, "u").await.unwrap();
        assert_eq!(sessions[0].id, "second");
        assert_eq!(sessions[1].id, "first");

        db.close().await.unwrap();
    }
}
