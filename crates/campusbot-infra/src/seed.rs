//! Base history loader.
//!
//! Reads the seed conversation once at startup. A missing or broken seed file
//! never prevents the server from starting; new sessions then simply start
//! with an empty history.

use std::path::Path;

use campusbot_core::history::base::parse_base_history;
use campusbot_types::chat::History;

/// Load and filter the seed conversation at `path`.
///
/// - missing file: warning, empty history
/// - unreadable or unparsable file: error, empty history
pub async fn load_base_history(path: &Path) -> History {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                path = %path.display(),
                "Base history file not found, starting with empty base history"
            );
            return History::new();
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "Failed to read base history");
            return History::new();
        }
    };

    match parse_base_history(&raw) {
        Ok(history) => {
            tracing::info!(
                path = %path.display(),
                turns = history.len(),
                "Loaded base history"
            );
            history
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "Failed to parse base history");
            History::new()
        }
    }
}
