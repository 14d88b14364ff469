//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] / [`PgStatsRepository`] - PostgreSQL via SQLx
//! - [`MemoryLinkRepository`] / [`MemoryStatsRepository`] - In-process maps

pub mod memory;
pub mod pg_link_repository;
pub mod pg_stats_repository;

pub use memory::{MemoryLinkRepository, MemoryStatsRepository};
pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;

use crate::domain::repositories::StorageError;

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::backend(err)
    }
}
