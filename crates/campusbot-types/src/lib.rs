//! Shared domain types for campusbot.
//!
//! Conversation turns, model request/response shapes, configuration and the
//! error enums shared across crates.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
