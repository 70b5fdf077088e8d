use crate::config::AppConfig;
use crate::db;
use crate::provider::{GeniusClient, LyricsProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn LyricsProvider>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config.database_url).await?;

        let provider = Arc::new(GeniusClient::new(&config.provider)?) as Arc<dyn LyricsProvider>;

        Ok(Self::from_parts(db, config, provider))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        provider: Arc<dyn LyricsProvider>,
    ) -> Self {
        Self {
            db,
            config,
            provider,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Migrated in-memory database plus the given provider.
    pub async fn for_tests(provider: Arc<dyn LyricsProvider>) -> Self {
        Self::with_test_db(db::test_pool().await, provider)
    }

    pub fn with_test_db(db: SqlitePool, provider: Arc<dyn LyricsProvider>) -> Self {
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            provider: crate::config::ProviderConfig {
                base_url: "https://fake.local".into(),
                timeout_secs: 1,
            },
        });
        Self::from_parts(db, config, provider)
    }
}
