//! SQLite session document store.
//!
//! Implements `HistoryStore` from `campusbot-core`. Each session is one row of
//! `chat_sessions`: the full history as a JSON array plus a database-assigned
//! `last_updated` stamp. Writes are full-replace upserts.

use campusbot_core::history::store::HistoryStore;
use campusbot_types::chat::{History, Turn};
use campusbot_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `HistoryStore`.
pub struct SqliteHistoryStore {
    pool: DatabasePool,
}

impl SqliteHistoryStore {
    /// Create a new history store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// When the session document was last written, if it exists.
    pub async fn last_updated(
        &self,
        session_id: &str,
    ) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        let row = sqlx::query("SELECT last_updated FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let raw: String = row
                    .try_get("last_updated")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(parse_datetime(&raw)?))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

/// Decode a stored document. Anything but a JSON array of turns is malformed.
fn decode_history(raw: &str) -> Result<History, RepositoryError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| RepositoryError::Malformed(format!("invalid JSON: {e}")))?;
    if !value.is_array() {
        return Err(RepositoryError::Malformed(
            "history is not a list".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::Malformed(format!("invalid turn: {e}")))
}

// ---------------------------------------------------------------------------
// HistoryStore implementation
// ---------------------------------------------------------------------------

impl HistoryStore for SqliteHistoryStore {
    async fn load(&self, session_id: &str) -> Result<Option<History>, RepositoryError> {
        let row = sqlx::query("SELECT history FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let raw: String = row
                    .try_get("history")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(decode_history(&raw)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, session_id: &str, history: &[Turn]) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(history)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize history: {e}")))?;

        sqlx::query(
            r#"INSERT INTO chat_sessions (id, history, last_updated)
               VALUES (?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
               ON CONFLICT (id) DO UPDATE SET history = excluded.history, last_updated = excluded.last_updated"#,
        )
        .bind(session_id)
        .bind(&raw)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
