//! Link creation, lookup, deletion and snapshots.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use super::click_stats::ClickStatsAggregator;
use crate::domain::entities::Link;
use crate::domain::expand::{ParseError, validate_pattern};
use crate::domain::repositories::{LinkRepository, StatsRepository, StorageError};

#[derive(Debug, Error)]
pub enum LinkServiceError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("long contains an invalid template: {0}")]
    Template(#[from] ParseError),

    #[error("link {0:?} not found")]
    NotFound(String),

    #[error("snapshot line {line}: {source}")]
    Snapshot {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for LinkServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(short) => Self::NotFound(short),
            other => Self::Storage(other),
        }
    }
}

/// A link as submitted for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLink {
    pub short: String,
    pub long: String,
    /// New owner; defaults to the saving user.
    pub owner: Option<String>,
}

/// Service for managing stored links.
///
/// Deleting a link also drops its click counts, and listings flush pending
/// clicks first so the store is current when it is read.
pub struct LinkService<L: LinkRepository + ?Sized, S: StatsRepository + ?Sized> {
    links: Arc<L>,
    stats: Arc<ClickStatsAggregator<S>>,
}

impl<L: LinkRepository + ?Sized, S: StatsRepository + ?Sized> LinkService<L, S> {
    pub fn new(links: Arc<L>, stats: Arc<ClickStatsAggregator<S>>) -> Self {
        Self { links, stats }
    }

    /// Creates or updates a link.
    ///
    /// `Created` is kept from the existing link, if any; `LastEdit` is set to
    /// now. The owner defaults to `user`.
    ///
    /// # Errors
    ///
    /// - [`LinkServiceError::Validation`] if `short` or `long` is empty or
    ///   `short` has characters other than letters, digits, `_`, `-`, `.`
    /// - [`LinkServiceError::Template`] if `long` is not a valid template
    /// - [`LinkServiceError::Storage`] on storage failures
    pub async fn save(&self, req: SaveLink, user: Option<&str>) -> Result<Link, LinkServiceError> {
        if req.short.is_empty() || req.long.is_empty() {
            return Err(LinkServiceError::Validation {
                field: if req.short.is_empty() { "short" } else { "long" },
                message: "short and long required".to_string(),
            });
        }
        if !Link::is_valid_short(&req.short) {
            return Err(LinkServiceError::Validation {
                field: "short",
                message: "short may only contain letters, numbers, dash, and period".to_string(),
            });
        }
        validate_pattern(&req.long)?;

        let now = Utc::now();
        let created = match self.links.load(&req.short).await {
            Ok(existing) => existing.created,
            Err(StorageError::NotFound(_)) => now,
            Err(e) => return Err(e.into()),
        };

        let owner = req
            .owner
            .filter(|owner| !owner.is_empty())
            .or_else(|| user.map(str::to_string))
            .unwrap_or_default();

        let mut link = Link::new(req.short, req.long, owner, now);
        link.created = created;

        self.links.save(link.clone()).await?;
        info!(short = %link.short, owner = %link.owner, "Saved link");
        Ok(link)
    }

    /// # Errors
    ///
    /// Returns [`LinkServiceError::NotFound`] if no link has this name.
    pub async fn get(&self, short: &str) -> Result<Link, LinkServiceError> {
        Ok(self.links.load(short).await?)
    }

    /// Deletes a link and its click counts, returning the deleted link.
    ///
    /// # Errors
    ///
    /// Returns [`LinkServiceError::NotFound`] if no link has this name.
    pub async fn delete(&self, short: &str) -> Result<Link, LinkServiceError> {
        let link = self.links.load(short).await?;
        self.links.delete(short).await?;

        if let Err(e) = self.stats.delete(&link.short).await {
            warn!(short = %link.short, error = %e, "Failed to delete click stats");
        }

        info!(short = %link.short, "Deleted link");
        Ok(link)
    }

    /// All links ordered by short name, after flushing pending clicks.
    ///
    /// # Errors
    ///
    /// Returns [`LinkServiceError::Storage`] if the flush or the load fails.
    pub async fn list(&self) -> Result<Vec<Link>, LinkServiceError> {
        self.stats.flush().await?;

        let mut links = self.links.load_all().await?;
        links.sort_by(|a, b| a.short.cmp(&b.short));
        Ok(links)
    }

    /// Snapshot of every link, one JSON object per line, ordered by short
    /// name.
    ///
    /// # Errors
    ///
    /// See [`Self::list`].
    pub async fn export(&self) -> Result<String, LinkServiceError> {
        let mut out = String::new();
        for link in self.list().await? {
            let line = serde_json::to_string(&link).map_err(StorageError::backend)?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Saves every link of an export snapshot that is not stored yet and
    /// returns how many were added. Existing links are left alone.
    ///
    /// # Errors
    ///
    /// - [`LinkServiceError::Snapshot`] if a line is not a link
    /// - [`LinkServiceError::Storage`] on storage failures
    pub async fn restore_snapshot(&self, snapshot: &str) -> Result<usize, LinkServiceError> {
        let mut restored = 0;

        for (i, line) in snapshot.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let link: Link = serde_json::from_str(line)
                .map_err(|source| LinkServiceError::Snapshot { line: i + 1, source })?;

            match self.links.load(&link.short).await {
                Ok(_) => continue,
                Err(StorageError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }

            self.links.save(link.normalized()).await?;
            restored += 1;
        }

        Ok(restored)
    }
}
