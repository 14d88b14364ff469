//! Repository trait definitions for the domain layer.
//!
//! These traits are the storage collaborator of the resolver and the click
//! statistics aggregator. Concrete implementations live in
//! `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link load/save/delete
//! - [`StatsRepository`] - Additive click totals
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.

pub mod link_repository;
pub mod stats_repository;

pub use link_repository::LinkRepository;
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;

/// Errors reported by storage implementations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested link does not exist.
    #[error("link {0:?} not found")]
    NotFound(String),

    /// The backing store failed; the source error is kept opaque.
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps any backend error.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }

    /// Returns true for [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
