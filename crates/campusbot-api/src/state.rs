//! Application state wiring the chat service together.
//!
//! AppState holds the concrete service instance used by the REST API. The
//! service is generic over store/provider traits, but AppState pins it to
//! the concrete infra implementations. Built once at startup; read-only after.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use campusbot_core::chat::service::{ChatService, ChatSettings};
use campusbot_infra::config::{database_path, load_app_config};
use campusbot_infra::llm::gemini::GeminiProvider;
use campusbot_infra::llm::{api_key_from_env, create_provider, API_KEY_ENV};
use campusbot_infra::paths::{ensure_data_dir, resolve_data_dir, sqlite_url};
use campusbot_infra::seed::load_base_history;
use campusbot_infra::sqlite::history::SqliteHistoryStore;
use campusbot_infra::sqlite::pool::DatabasePool;
use campusbot_types::config::AppConfig;

/// Chat service pinned to the SQLite store and the Gemini provider.
pub type ConcreteChatService = ChatService<SqliteHistoryStore, GeminiProvider>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize from the environment: data dir, `config.toml`, API key.
    pub async fn init() -> anyhow::Result<Self> {
        let (data_dir, config) = load_settings().await?;
        Self::build(data_dir, config, api_key_from_env()).await
    }

    /// Wire the service from already-resolved settings.
    ///
    /// Fails when `api_key` is `None` or the database cannot be opened. A
    /// missing or broken seed file does not fail; sessions then start empty.
    pub async fn build(
        data_dir: PathBuf,
        config: AppConfig,
        api_key: Option<SecretString>,
    ) -> anyhow::Result<Self> {
        let api_key =
            api_key.with_context(|| format!("{API_KEY_ENV} environment variable not set"))?;
        let provider = create_provider(&config.model, Some(api_key))?;

        let store = open_history_store(&data_dir, &config).await?;
        let base_history = load_base_history(&config.paths.base_history).await;

        tracing::info!(
            model = %config.model.name,
            base_turns = base_history.len(),
            "Chat service ready"
        );

        let settings = ChatSettings {
            system_instruction: config.model.system_instruction.clone(),
            generation: config.generation.clone(),
        };
        let chat_service = ChatService::new(store, provider, base_history.into(), settings);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
        })
    }

    /// Directory the entry page is served from.
    pub fn static_dir(&self) -> &Path {
        &self.config.paths.static_dir
    }
}

/// Resolve the data directory (creating it) and load `config.toml`.
pub async fn load_settings() -> anyhow::Result<(PathBuf, AppConfig)> {
    let data_dir = resolve_data_dir();
    ensure_data_dir(&data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    let config = load_app_config(&data_dir).await;
    Ok((data_dir, config))
}

/// Open (and migrate) the session database.
pub async fn open_history_store(
    data_dir: &Path,
    config: &AppConfig,
) -> anyhow::Result<SqliteHistoryStore> {
    let db_path = database_path(config, data_dir);
    let pool = DatabasePool::new(&sqlite_url(&db_path))
        .await
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    Ok(SqliteHistoryStore::new(pool))
}
