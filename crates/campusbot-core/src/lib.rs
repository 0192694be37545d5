//! Business logic and port definitions for campusbot.
//!
//! This crate defines the "ports" (`HistoryStore`, `LlmProvider`) that the
//! infrastructure layer implements, plus the session-history lifecycle and
//! the chat request handler built on them. It depends only on
//! `campusbot-types` -- never on `campusbot-infra` or any database/IO crate.

pub mod chat;
pub mod history;
pub mod llm;

#[cfg(test)]
pub(crate) mod testing;
