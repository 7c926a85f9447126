use anyhow::{bail, Context, Result};
use roster::config::StorageBackend;
use roster::db::PostgresProfileStore;
use roster::Config;

pub async fn run(config: &Config) -> Result<()> {
    if config.storage.backend != StorageBackend::Postgres {
        bail!("migrate needs storage.backend = \"postgres\"");
    }

    let store = PostgresProfileStore::connect(&config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    store.migrate().await.context("Failed to run migrations")?;

    tracing::info!("Migrations applied");
    Ok(())
}
