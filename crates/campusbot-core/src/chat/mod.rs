//! Chat request handling for campusbot.
//!
//! `ChatService` turns one user message into one model call plus one history
//! write, on top of the ports defined in `history` and `llm`.

pub mod service;
