//! Metrics repository - database queries for monitoring

use sqlx::PgPool;

/// Repository for metrics database operations
#[derive(Clone)]
pub struct MetricsRepository {
    pool: PgPool,
}

impl MetricsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_public_profiles(&self) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE is_public")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub fn get_pool_size(&self) -> u32 {
        self.pool.size()
    }

    pub fn get_num_idle(&self) -> usize {
        self.pool.num_idle()
    }
}
