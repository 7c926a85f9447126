//! Metrics service for collecting application metrics

use crate::db::{MetricsRepository, ProfileStore};
use roster_search::{Clause, Condition, Predicate};
use std::sync::Arc;

/// Service for collecting application metrics
pub struct MetricsService {
    store: Arc<dyn ProfileStore>,
    repo: Option<MetricsRepository>,
}

impl MetricsService {
    /// `repo` is only present for the Postgres backend.
    pub fn new(store: Arc<dyn ProfileStore>, repo: Option<MetricsRepository>) -> Self {
        Self { store, repo }
    }

    /// Update database connection pool metrics
    pub fn update_db_connection_metrics(&self) {
        let Some(repo) = &self.repo else {
            return;
        };
        let pool_size = repo.get_pool_size();
        let idle = repo.get_num_idle() as u32;

        crate::metrics::DB_CONNECTIONS_ACTIVE.set(pool_size.saturating_sub(idle) as i64);
        crate::metrics::DB_CONNECTIONS_IDLE.set(idle as i64);
    }

    pub async fn update_public_profiles(&self) {
        let count = match &self.repo {
            Some(repo) => repo.count_public_profiles().await.map_err(crate::Error::from),
            None => {
                let public = Predicate::default().and(Clause::single(Condition::IsPublic));
                self.store
                    .find_profiles(&public)
                    .await
                    .map(|profiles| profiles.len() as i64)
            }
        };

        match count {
            Ok(count) => crate::metrics::PUBLIC_PROFILES.set(count),
            Err(e) => tracing::warn!(error = %e, "Failed to count public profiles"),
        }
    }

    /// Collect all custom application metrics
    pub async fn collect_custom_metrics(&self, server_version: &str) -> String {
        self.update_db_connection_metrics();
        self.update_public_profiles().await;

        let mut output = String::new();
        output.push_str("# HELP roster_server_info Directory server information\n");
        output.push_str("# TYPE roster_server_info gauge\n");
        output.push_str(&format!(
            "roster_server_info{{version=\"{}\",backend=\"{}\"}} 1\n",
            server_version,
            self.store.backend()
        ));

        output
    }
}
