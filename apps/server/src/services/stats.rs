//! Read-only directory statistics

use crate::db::{CountryCount, ProfileStore};
use crate::Result;
use roster_models::Enumerations;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct PositionStat {
    pub position: String,
    pub label: String,
    pub profiles_count: i64,
}

pub struct StatsService {
    store: Arc<dyn ProfileStore>,
    enumerations: Arc<Enumerations>,
}

impl StatsService {
    pub fn new(store: Arc<dyn ProfileStore>, enumerations: Arc<Enumerations>) -> Self {
        Self {
            store,
            enumerations,
        }
    }

    /// Countries with at least one public profile, by name.
    pub async fn represented_countries(&self) -> Result<Vec<CountryCount>> {
        let mut counts = self.store.count_public_by_country().await?;
        counts.retain(|c| c.profiles_count > 0);
        Ok(counts)
    }

    /// Public profile counts per position, largest first.
    pub async fn top_positions(&self) -> Result<Vec<PositionStat>> {
        let counts = self.store.count_public_by_position().await?;
        Ok(counts
            .into_iter()
            .map(|c| PositionStat {
                label: self
                    .enumerations
                    .positions
                    .label_or_code(&c.position)
                    .to_string(),
                position: c.position,
                profiles_count: c.profiles_count,
            })
            .collect())
    }
}
