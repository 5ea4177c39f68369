// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user counts backing the daily limit and usage stats.

use rusqlite::params;
use solace_core::{Mode, SolaceError};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

/// Count user-authored messages created at or after `since`.
pub async fn count_user_messages_since(
    db: &Database,
    user_id: &str,
    since: &str,
) -> Result<i64, SolaceError> {
    let user_id = user_id.to_string();
    let since = since.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM messages
                 WHERE user_id = ?1 AND role = 'user' AND created_at >= ?2",
                params![user_id, since],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Count every user-authored message.
pub async fn count_user_messages(db: &Database, user_id: &str) -> Result<i64, SolaceError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE user_id = ?1 AND role = 'user'",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Session counts per mode. Modes with no sessions are omitted.
pub async fn count_sessions_by_mode(
    db: &Database,
    user_id: &str,
) -> Result<Vec<(Mode, i64)>, SolaceError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<(Mode, i64)>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT mode, COUNT(*) FROM sessions WHERE user_id = ?1
                 GROUP BY mode ORDER BY mode",
            )?;
            let counts = stmt
                .query_map(params![user_id], |row| {
                    Ok((parse_column(row, 0)?, row.get(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(counts)
        })
        .await
        .map_err(map_tr_err)
}
