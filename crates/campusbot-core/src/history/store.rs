//! HistoryStore trait definition.
//!
//! One document per session, keyed by session id, holding the full ordered
//! history. Uses RPITIT so implementations can be plain `async fn`.

use campusbot_types::chat::{History, Turn};
use campusbot_types::error::RepositoryError;

/// Repository trait for session history documents.
///
/// Implementations live in campusbot-infra (e.g., `SqliteHistoryStore`).
pub trait HistoryStore: Send + Sync {
    /// Fetch the history document for `session_id`.
    ///
    /// `Ok(None)` when no document exists. A document whose history field is
    /// missing or not a list of turns is `Err(RepositoryError::Malformed)`.
    fn load(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<History>, RepositoryError>> + Send;

    /// Overwrite the history document for `session_id` and stamp its
    /// last-updated time. Full replace, no merge; the last writer wins.
    fn save(
        &self,
        session_id: &str,
        history: &[Turn],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
