//! In-process storage for development and tests.
//!
//! Nothing survives a restart; use `SNAPSHOT_PATH` to seed links at startup.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::entities::{ClickStats, Link};
use crate::domain::repositories::{LinkRepository, StatsRepository, StorageError};
use crate::utils::link_id::link_id;

/// Links held in a map keyed by normalized ID.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: RwLock<HashMap<String, Link>>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn load_all(&self) -> Result<Vec<Link>, StorageError> {
        Ok(self.links.read().values().cloned().collect())
    }

    async fn load(&self, short: &str) -> Result<Link, StorageError> {
        self.links
            .read()
            .get(&link_id(short))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(short.to_string()))
    }

    async fn save(&self, link: Link) -> Result<(), StorageError> {
        let link = link.normalized();
        self.links.write().insert(link.id.clone(), link);
        Ok(())
    }

    async fn delete(&self, short: &str) -> Result<(), StorageError> {
        self.links
            .write()
            .remove(&link_id(short))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(short.to_string()))
    }
}

/// Click totals held in a map keyed by normalized ID.
#[derive(Debug, Default)]
pub struct MemoryStatsRepository {
    stats: RwLock<ClickStats>,
}

impl MemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsRepository for MemoryStatsRepository {
    async fn load_stats(&self) -> Result<ClickStats, StorageError> {
        Ok(self.stats.read().clone())
    }

    async fn save_stats(&self, deltas: &ClickStats) -> Result<(), StorageError> {
        let mut stats = self.stats.write();
        for (short, clicks) in deltas {
            *stats.entry(link_id(short)).or_default() += clicks;
        }
        Ok(())
    }

    async fn delete_stats(&self, short: &str) -> Result<(), StorageError> {
        self.stats.write().remove(&link_id(short));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_links_are_keyed_by_id() {
        let repo = MemoryLinkRepository::new();
        repo.save(Link::new("Foo-Bar", "http://foo/", "", Utc::now()))
            .await
            .unwrap();

        assert_eq!(repo.load("foobar").await.unwrap().short, "Foo-Bar");
        assert_eq!(repo.load("FOO-BAR").await.unwrap().id, "foobar");

        repo.save(Link::new("foobar", "http://bar/", "", Utc::now()))
            .await
            .unwrap();
        let all = repo.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].long, "http://bar/");
    }

    #[tokio::test]
    async fn test_link_not_found() {
        let repo = MemoryLinkRepository::new();

        assert!(repo.load("nope").await.unwrap_err().is_not_found());
        assert!(repo.delete("nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_link() {
        let repo = MemoryLinkRepository::new();
        repo.save(Link::new("a", "http://a/", "", Utc::now()))
            .await
            .unwrap();

        repo.delete("A").await.unwrap();
        assert!(repo.load("a").await.is_err());
    }

    #[tokio::test]
    async fn test_stats_are_additive() {
        let repo = MemoryStatsRepository::new();
        let first: ClickStats = [("a".to_string(), 1)].into_iter().collect();
        let second: ClickStats = [("a".to_string(), 1), ("b".to_string(), 2)]
            .into_iter()
            .collect();

        repo.save_stats(&first).await.unwrap();
        repo.save_stats(&second).await.unwrap();

        let expected: ClickStats = [("a".to_string(), 2), ("b".to_string(), 2)]
            .into_iter()
            .collect();
        assert_eq!(repo.load_stats().await.unwrap(), expected);

        repo.delete_stats("a").await.unwrap();
        repo.delete_stats("missing").await.unwrap();
        assert_eq!(repo.load_stats().await.unwrap().get("a"), None);
    }
}
