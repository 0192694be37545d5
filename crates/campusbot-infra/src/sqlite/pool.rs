//! SQLite pool backing the `chat_sessions` table.
//!
//! Chat requests read a session document, wait on the model, then upsert the
//! whole document back. Reads fan out over several connections; every upsert
//! goes through one writer connection so concurrent requests never contend
//! for the SQLite write lock.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Session database handles.
///
/// - `reader`: up to 8 read-only connections for `load` and `last_updated`.
/// - `writer`: one connection; runs migrations and every session upsert.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the session database at `database_url`, creating the file and the
    /// `chat_sessions` schema on first use.
    ///
    /// WAL lets the API keep serving reads while the writer commits a
    /// session; the 5 s busy timeout covers a `campusbot session` reader
    /// racing a live server.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        // Readers are read-only and cannot create the table.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(read_opts)
            .await?;

        tracing::debug!(url = %database_url, "Database pool ready");

        Ok(Self { reader, writer })
    }
}
