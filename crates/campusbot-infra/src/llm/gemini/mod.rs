//! Google Gemini provider (native `generateContent` REST API).

pub mod client;
mod types;

pub use client::GeminiProvider;
