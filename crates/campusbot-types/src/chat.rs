//! Conversation types for campusbot.
//!
//! A conversation is an ordered list of [`Turn`]s. Each turn carries a
//! [`Role`] and one or more plain-text [`Part`]s. The same shape is used for
//! the seed (base) history, the persisted session document and the model
//! request contents, so it serializes exactly as the wire format:
//! `{"role": "user", "parts": [{"text": "..."}]}`.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// A plain-text content fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    /// A single-part user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// A single-part model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Ordered turns of one conversation, oldest first.
pub type History = Vec<Turn>;

/// Successful outcome of one chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Model reply text.
    pub reply: String,
    /// Session the exchange was recorded under (possibly newly generated).
    pub session_id: String,
}
