//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::{LinkRepository, StorageError};
use crate::utils::link_id::link_id;

/// PostgreSQL repository for link storage and retrieval.
///
/// Rows are keyed by normalized link ID, so lookups by any spelling of a
/// short name hit the same row.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LinkRow {
    id: String,
    short: String,
    long: String,
    created: DateTime<Utc>,
    last_edit: DateTime<Utc>,
    owner: String,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Self {
            id: row.id,
            short: row.short,
            long: row.long,
            created: row.created,
            last_edit: row.last_edit,
            owner: row.owner,
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn load_all(&self) -> Result<Vec<Link>, StorageError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            "SELECT id, short, long, created, last_edit, owner FROM links",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn load(&self, short: &str) -> Result<Link, StorageError> {
        let row = sqlx::query_as::<_, LinkRow>(
            "SELECT id, short, long, created, last_edit, owner FROM links WHERE id = $1",
        )
        .bind(link_id(short))
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from)
            .ok_or_else(|| StorageError::NotFound(short.to_string()))
    }

    async fn save(&self, link: Link) -> Result<(), StorageError> {
        let link = link.normalized();

        sqlx::query(
            r#"
            INSERT INTO links (id, short, long, created, last_edit, owner)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                short = EXCLUDED.short,
                long = EXCLUDED.long,
                created = EXCLUDED.created,
                last_edit = EXCLUDED.last_edit,
                owner = EXCLUDED.owner
            "#,
        )
        .bind(&link.id)
        .bind(&link.short)
        .bind(&link.long)
        .bind(link.created)
        .bind(link.last_edit)
        .bind(&link.owner)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete(&self, short: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(link_id(short))
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(short.to_string()));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
