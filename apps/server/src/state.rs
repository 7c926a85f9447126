//! Shared application state

use std::sync::Arc;

use anyhow::Context;
use roster_search::ProfileSearchEngine;

use crate::admin_auth::AdminToken;
use crate::config::{Config, StorageBackend};
use crate::db::{InMemoryProfileStore, MetricsRepository, PostgresProfileStore, ProfileStore};
use crate::services::{DirectoryService, MetricsService, StatsService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ProfileStore>,
    pub engine: Arc<ProfileSearchEngine>,
    pub directory_service: Arc<DirectoryService>,
    pub stats_service: Arc<StatsService>,
    pub metrics_service: Arc<MetricsService>,
    pub admin_token: Option<AdminToken>,
}

impl AppState {
    /// Connect the configured backend and build the services on top of it.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (store, metrics_repo) = open_store(&config).await?;
        Self::build(config, store, metrics_repo)
    }

    /// State over an already constructed store.
    pub fn from_store(config: Config, store: Arc<dyn ProfileStore>) -> anyhow::Result<Self> {
        Self::build(config, store, None)
    }

    fn build(
        config: Config,
        store: Arc<dyn ProfileStore>,
        metrics_repo: Option<MetricsRepository>,
    ) -> anyhow::Result<Self> {
        let enumerations = Arc::new(
            config
                .directory
                .load_enumerations()
                .context("Failed to load enumerations")?,
        );
        let engine = Arc::new(ProfileSearchEngine::with_options(
            enumerations.clone(),
            config.directory.search_options(),
        ));

        let directory_service = Arc::new(DirectoryService::new(
            store.clone(),
            engine.clone(),
            config.directory.page_size,
        ));
        let stats_service = Arc::new(StatsService::new(store.clone(), enumerations));
        let metrics_service = Arc::new(MetricsService::new(store.clone(), metrics_repo));

        let admin_token = AdminToken::from_config(config.admin.token.as_deref());
        if admin_token.is_none() {
            tracing::info!("No admin token configured; admin routes are disabled");
        }

        Ok(Self {
            config: Arc::new(config),
            store,
            engine,
            directory_service,
            stats_service,
            metrics_service,
            admin_token,
        })
    }
}

/// Open the configured storage backend, running migrations when enabled.
///
/// The metrics repository is only available for Postgres.
pub async fn open_store(
    config: &Config,
) -> anyhow::Result<(Arc<dyn ProfileStore>, Option<MetricsRepository>)> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let store = PostgresProfileStore::connect(&config.database)
                .await
                .context("Failed to connect to PostgreSQL")?;
            if config.database.run_migrations {
                store.migrate().await.context("Failed to run migrations")?;
                tracing::info!("Database migrations applied");
            }
            let repo = MetricsRepository::new(store.pool().clone());
            Ok((Arc::new(store), Some(repo)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Ok((Arc::new(InMemoryProfileStore::new()), None))
        }
    }
}
