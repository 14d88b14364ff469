//! Repository trait for short link data access.

use async_trait::async_trait;

use super::StorageError;
use crate::domain::entities::Link;

/// Repository interface for stored links.
///
/// Every method accepts either the short name as typed by a user or its
/// normalized ID; implementations normalize with
/// [`crate::utils::link_id::link_id`] before touching storage.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns all stored links in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on storage failures.
    async fn load_all(&self) -> Result<Vec<Link>, StorageError>;

    /// Loads a link by short name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no link has the normalized ID.
    /// Returns [`StorageError::Backend`] on storage failures.
    async fn load(&self, short: &str) -> Result<Link, StorageError>;

    /// Inserts or replaces a link, keyed by `link_id(link.short)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on storage failures.
    async fn save(&self, link: Link) -> Result<(), StorageError>;

    /// Removes a link by short name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if nothing was deleted.
    /// Returns [`StorageError::Backend`] on storage failures.
    async fn delete(&self, short: &str) -> Result<(), StorageError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
