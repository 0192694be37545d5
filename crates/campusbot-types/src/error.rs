use thiserror::Error;

/// Errors from the chat request handler. Each maps to one HTTP status.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("response blocked by content policy: {reason}")]
    ContentBlocked { reason: String },

    #[error("model returned an empty response")]
    EmptyModelResponse,

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from history store operations (used by trait definitions in campusbot-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}
