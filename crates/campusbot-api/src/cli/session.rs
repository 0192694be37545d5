//! Session inspection command.
//!
//! Prints a stored conversation, oldest turn first, with the time it was
//! last written. Reads the database directly; no API key needed.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use console::style;
use serde_json::Value;

use campusbot_core::history::store::HistoryStore;
use campusbot_infra::sqlite::history::SqliteHistoryStore;
use campusbot_types::chat::{History, Role, Turn};
use campusbot_types::config::AppConfig;

use crate::state::open_history_store;

/// A stored session as read back for display.
#[derive(Debug)]
pub struct SessionView {
    pub session_id: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub history: History,
}

impl SessionView {
    /// The `--json` shape: `{"sessionId", "lastUpdated", "history"}`.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "sessionId": self.session_id,
            "lastUpdated": self.last_updated.map(|t| t.to_rfc3339()),
            "history": self.history,
        })
    }

    /// Human-readable transcript.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  {} {} ({} turns)",
            style("Session").bold(),
            style(&self.session_id).cyan(),
            self.history.len()
        );
        if let Some(ts) = self.last_updated {
            let _ = writeln!(
                out,
                "  {}",
                style(format!("Last updated {}", ts.format("%Y-%m-%d %H:%M:%S UTC"))).dim()
            );
        }
        let _ = writeln!(out);

        for turn in &self.history {
            let _ = writeln!(out, "  {} {}", role_label(turn), turn.text());
        }
        out
    }
}

/// Read `session_id` and its last write time from the store.
pub async fn load_session(store: &SqliteHistoryStore, session_id: &str) -> Result<SessionView> {
    let Some(history) = store.load(session_id).await? else {
        bail!("Session '{session_id}' not found");
    };
    let last_updated = store.last_updated(session_id).await?;

    Ok(SessionView {
        session_id: session_id.to_string(),
        last_updated,
        history,
    })
}

/// Show the history stored under `session_id`.
///
/// # Examples
///
/// ```bash
/// campusbot session sid_20250101120000123456_ab12cd34
/// campusbot session sid_20250101120000123456_ab12cd34 --json
/// ```
pub async fn show_session(
    data_dir: &Path,
    config: &AppConfig,
    session_id: &str,
    json: bool,
) -> Result<()> {
    let store = open_history_store(data_dir, config).await?;
    let view = load_session(&store, session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view.to_json())?);
    } else {
        println!("{}", view.render());
    }

    Ok(())
}

fn role_label(turn: &Turn) -> console::StyledObject<&'static str> {
    match turn.role {
        Role::User => style("you  ").green().bold(),
        Role::Model => style("bot  ").magenta().bold(),
    }
}
