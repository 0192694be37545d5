//! Configuration types for campusbot.
//!
//! `AppConfig` represents the `config.toml` in the data directory. Every
//! field has a default, so an empty or missing file yields a working setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::GenerationConfig;

/// Persona instruction sent as the system instruction on every request.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Act as an specific chatbot for 'Our Lady of Fatima University' located at 1 Esperanza, Quezon City, 1118 Metro Manila\n\nParent organization: Our Lady of Fatima University Valenzuela City\n\nFocus only on Senior High School\n\nIf the query is not related to Senior High School of Our Lady of Fatima University - Quezon City Campus, say 'I do not know'\n";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

/// Which model to call and how to address it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
}

fn default_model_name() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_system_instruction() -> String {
    DEFAULT_SYSTEM_INSTRUCTION.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            base_url: default_base_url(),
            system_instruction: default_system_instruction(),
        }
    }
}

/// File locations. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Seed conversation that primes every new session.
    #[serde(default = "default_base_history")]
    pub base_history: PathBuf,

    /// Directory holding `index.html` and its assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// SQLite database file. `None` means `{data_dir}/campusbot.db`.
    #[serde(default)]
    pub database: Option<PathBuf>,
}

fn default_base_history() -> PathBuf {
    PathBuf::from("chat_history.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_history: default_base_history(),
            static_dir: default_static_dir(),
            database: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.model.name, "gemini-1.5-flash");
        assert!(config.model.system_instruction.contains("I do not know"));
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.paths.base_history, PathBuf::from("chat_history.json"));
        assert!(config.paths.database.is_none());
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.model.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.generation.max_output_tokens, 8192);
        assert_eq!(config.paths.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_app_config_deserialize_partial_sections() {
        let toml_str = r#"
[model]
name = "gemini-2.0-flash"

[generation]
temperature = 0.4

[paths]
database = "/var/lib/campusbot/sessions.db"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.name, "gemini-2.0-flash");
        assert_eq!(config.model.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);
        assert!((config.generation.temperature - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(
            config.paths.database,
            Some(PathBuf::from("/var/lib/campusbot/sessions.db"))
        );
    }
}
