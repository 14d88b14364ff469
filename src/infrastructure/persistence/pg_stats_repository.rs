//! PostgreSQL implementation of statistics repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ClickStats;
use crate::domain::repositories::{StatsRepository, StorageError};
use crate::utils::link_id::link_id;

/// PostgreSQL repository for click totals.
///
/// One row per link; flushed deltas are added to the stored value.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn load_stats(&self) -> Result<ClickStats, StorageError> {
        let rows = sqlx::query_as::<_, (String, i64)>("SELECT id, clicks FROM stats")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, clicks)| (id, u64::try_from(clicks).unwrap_or_default()))
            .collect())
    }

    async fn save_stats(&self, deltas: &ClickStats) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        for (short, clicks) in deltas {
            let clicks = i64::try_from(*clicks).map_err(StorageError::backend)?;

            sqlx::query(
                r#"
                INSERT INTO stats (id, clicks)
                VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET clicks = stats.clicks + EXCLUDED.clicks
                "#,
            )
            .bind(link_id(short))
            .bind(clicks)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_stats(&self, short: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM stats WHERE id = $1")
            .bind(link_id(short))
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
