//! Infrastructure layer for campusbot.
//!
//! Contains implementations of the ports defined in `campusbot-core`: the
//! SQLite session document store and the Gemini client. Also hosts the
//! startup-time loaders for configuration and the seed conversation.

pub mod config;
pub mod llm;
pub mod paths;
pub mod seed;
pub mod sqlite;
