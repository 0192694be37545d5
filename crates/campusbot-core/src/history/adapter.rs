//! History Store Adapter.
//!
//! The only place where store failures are interpreted. `load` folds
//! "invalid id", "no document", "malformed document" and "store call failed"
//! into [`StoredHistory::Absent`]; `save` folds every failure into `false`.
//! Callers above this layer never see a `RepositoryError`, so a transient
//! store outage looks exactly like a brand-new session.

use campusbot_types::chat::{History, Turn};
use campusbot_types::error::RepositoryError;
use tracing::{debug, error, warn};

use super::store::HistoryStore;

/// Outcome of loading a session's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredHistory {
    Found(History),
    Absent,
}

/// Basic syntactic check on a session id.
///
/// The id is used as a document key, so it must be non-empty and must not
/// contain the path separator `/`.
pub fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty() && !session_id.contains('/')
}

/// Wraps a [`HistoryStore`] and never propagates its errors.
pub struct HistoryStoreAdapter<S: HistoryStore> {
    store: S,
}

impl<S: HistoryStore> HistoryStoreAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the history for `session_id`, treating every failure as absent.
    pub async fn load(&self, session_id: &str) -> StoredHistory {
        if !is_valid_session_id(session_id) {
            warn!(session_id = %session_id, "Attempted to load history with invalid session ID");
            return StoredHistory::Absent;
        }

        match self.store.load(session_id).await {
            Ok(Some(history)) => {
                debug!(session_id = %session_id, turns = history.len(), "History loaded");
                StoredHistory::Found(history)
            }
            Ok(None) => {
                debug!(session_id = %session_id, "Session document not found");
                StoredHistory::Absent
            }
            Err(RepositoryError::Malformed(reason)) => {
                warn!(session_id = %session_id, %reason, "Invalid history format in store");
                StoredHistory::Absent
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Store error loading history");
                StoredHistory::Absent
            }
        }
    }

    /// Overwrite the history for `session_id`. Returns whether it was stored.
    pub async fn save(&self, session_id: &str, history: &[Turn]) -> bool {
        if !is_valid_session_id(session_id) {
            error!(session_id = %session_id, "Attempted to save history with invalid session ID");
            return false;
        }

        match self.store.save(session_id, history).await {
            Ok(()) => {
                debug!(session_id = %session_id, turns = history.len(), "History saved");
                true
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Store error saving history");
                false
            }
        }
    }
}
