//! Application configuration loader for campusbot.
//!
//! Reads `config.toml` from the data directory (`~/.campusbot/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use campusbot_types::config::AppConfig;

/// File name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Load application configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// SQLite file for session documents: `[paths] database`, else
/// `{data_dir}/campusbot.db`.
pub fn database_path(config: &AppConfig, data_dir: &Path) -> PathBuf {
    config
        .paths
        .database
        .clone()
        .unwrap_or_else(|| data_dir.join("campusbot.db"))
}
