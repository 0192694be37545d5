//! LLM provider abstraction for campusbot.
//!
//! `LlmProvider` is the collaborator port the chat handler calls once per
//! request. Concrete providers live in campusbot-infra.

pub mod provider;
