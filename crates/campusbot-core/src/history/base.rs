//! Base (seed) history filtering.
//!
//! The seed file is a JSON array of `{role, parts: [...]}` entries exported
//! from a prompt-design tool. Parts may reference uploaded files
//! (`fileData`), which cannot be replayed to the model; only plain-text
//! parts survive. Reading the file is the infra layer's job.

use campusbot_types::chat::{History, Part, Role, Turn};
use serde::Deserialize;
use serde_json::Value;

/// A seed entry before filtering. Entries without `parts` are skipped.
#[derive(Debug, Deserialize)]
struct SeedEntry {
    role: Role,
    #[serde(default)]
    parts: Option<Vec<Value>>,
}

/// Parse seed JSON and keep only plain-text content.
///
/// - a part carrying `fileData`, or lacking a string `text`, is dropped
/// - a turn with no remaining parts is dropped
///
/// Fails only when the document is not an array of `{role, parts}` objects.
pub fn parse_base_history(raw: &str) -> Result<History, serde_json::Error> {
    let entries: Vec<SeedEntry> = serde_json::from_str(raw)?;
    Ok(filter_seed_entries(entries))
}

fn filter_seed_entries(entries: Vec<SeedEntry>) -> History {
    entries
        .into_iter()
        .filter_map(|entry| {
            let parts: Vec<Part> = entry
                .parts?
                .iter()
                .filter_map(text_part)
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(Turn {
                    role: entry.role,
                    parts,
                })
            }
        })
        .collect()
}

fn text_part(part: &Value) -> Option<Part> {
    if part.get("fileData").is_some() {
        return None;
    }
    part.get("text").and_then(Value::as_str).map(Part::text)
}
