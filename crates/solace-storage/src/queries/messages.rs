// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message CRUD operations.

use rusqlite::{TransactionBehavior, params};
use solace_core::{DailyQuota, Message, SolaceError};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        session_id: row.get(1)?,
        user_id: row.get(2)?,
        role: parse_column(row, 3)?,
        content: row.get(4)?,
        mode: parse_column(row, 5)?,
        sentiment: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn insert(conn: &rusqlite::Connection, msg: &Message) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO messages (id, session_id, user_id, role, content, mode, sentiment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            msg.id,
            msg.session_id,
            msg.user_id,
            msg.role.to_string(),
            msg.content,
            msg.mode.to_string(),
            msg.sentiment,
            msg.created_at,
        ],
    )?;
    Ok(())
}

/// Insert a single message outside any exchange.
#[cfg(test)]
pub(crate) async fn insert_message(db: &Database, msg: &Message) -> Result<(), SolaceError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> { insert(conn, &msg) })
        .await
        .map_err(map_tr_err)
}

/// Get messages for a session in chronological order.
///
/// With `limit`, only the most recent `limit` messages are returned, still
/// oldest first.
pub async fn get_messages_for_session(
    db: &Database,
    session_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Message>, SolaceError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let messages = match limit {
                Some(lim) => {
                    let mut stmt = conn.prepare(
                        "SELECT id, session_id, user_id, role, content, mode, sentiment, created_at
                         FROM (
                             SELECT *, rowid AS seq FROM messages WHERE session_id = ?1
                             ORDER BY created_at DESC, seq DESC LIMIT ?2
                         )
                         ORDER BY created_at ASC, seq ASC",
                    )?;
                    stmt.query_map(params![session_id, lim], row_to_message)?
                        .collect::<Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT id, session_id, user_id, role, content, mode, sentiment, created_at
                         FROM messages WHERE session_id = ?1
                         ORDER BY created_at ASC, rowid ASC",
                    )?;
                    stmt.query_map(params![session_id], row_to_message)?
                        .collect::<Result<Vec<_>, _>>()?
                }
            };
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Store a user/assistant exchange in one transaction.
///
/// Both messages must belong to the same session. The transaction takes the
/// write lock before counting, so concurrent exchanges for one user see each
/// other's rows. Returns `RateLimited` without writing when the user already
/// has `quota.limit` messages since `quota.since`; otherwise the new count.
///
/// The session's `message_count` grows by two. `new_title` is applied only
/// while the session still carries its default title.
pub async fn record_exchange(
    db: &Database,
    user_message: &Message,
    assistant_message: &Message,
    new_title: Option<&str>,
    quota: &DailyQuota,
) -> Result<i64, SolaceError> {
    let user_message = user_message.clone();
    let assistant_message = assistant_message.clone();
    let new_title = new_title.map(str::to_string);
    let since = quota.since.clone();
    let limit = quota.limit;

    let stored = db
        .connection()
        .call(move |conn| -> Result<Option<i64>, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let sent: i64 = tx.query_row(
                "SELECT COUNT(*) FROM messages
                 WHERE user_id = ?1 AND role = 'user' AND created_at >= ?2",
                params![user_message.user_id, since],
                |row| row.get(0),
            )?;
            if sent >= i64::from(limit) {
                return Ok(None);
            }

            insert(&tx, &user_message)?;
            insert(&tx, &assistant_message)?;
            let updated = tx.execute(
                "UPDATE sessions
                 SET message_count = message_count + 2,
                     title = CASE WHEN ?1 IS NOT NULL AND title_is_default = 1
                                  THEN ?1 ELSE title END,
                     title_is_default = CASE WHEN ?1 IS NOT NULL THEN 0
                                             ELSE title_is_default END
                 WHERE id = ?2 AND user_id = ?3",
                params![new_title, user_message.session_id, user_message.user_id],
            )?;
            if updated != 1 {
                // Dropping the transaction rolls back both inserts.
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            tx.commit()?;
            Ok(Some(sent + 1))
        })
        .await
        .map_err(map_tr_err)?;

    stored.ok_or(SolaceError::RateLimited { limit })
}
