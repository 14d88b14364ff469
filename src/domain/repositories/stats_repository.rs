//! Repository trait for persisted click totals.

use async_trait::async_trait;

use super::StorageError;
use crate::domain::entities::ClickStats;

/// Repository interface for click counters.
///
/// Totals are stored per normalized link ID. Writes are deltas: the store
/// adds them to whatever it already holds.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStatsRepository`] - In-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Returns the total clicks recorded for every link.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on storage failures.
    async fn load_stats(&self) -> Result<ClickStats, StorageError>;

    /// Adds `deltas` to the stored totals.
    ///
    /// The batch is applied atomically: either every key is updated or none
    /// is.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on storage failures.
    async fn save_stats(&self, deltas: &ClickStats) -> Result<(), StorageError>;

    /// Removes the stored total for one link.
    ///
    /// Deleting a key that has no total is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on storage failures.
    async fn delete_stats(&self, short: &str) -> Result<(), StorageError>;
}
