//! HTTP layer for campusbot.
//!
//! Axum router with the chat and health endpoints under `/api/`, the static
//! entry page at `/`, and CORS support.

pub mod error;
pub mod handlers;
pub mod router;
