//! In-memory click counters with periodic persistence.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::domain::entities::{ClickCount, ClickStats};
use crate::domain::repositories::{StatsRepository, StorageError};
use crate::utils::link_id::link_id;

#[derive(Debug, Default)]
struct Counters {
    /// Best known totals: persisted counts plus everything recorded since.
    clicks: ClickStats,
    /// Clicks recorded since the last flush.
    dirty: ClickStats,
}

/// Counts redirects and writes them to storage in batches.
///
/// Recording a click only touches memory. [`Self::flush`] moves the pending
/// deltas out under the lock and persists them after releasing it, so
/// clicks recorded during a flush land in the next batch.
///
/// Storage writes from [`Self::flush`] and [`Self::delete`] are serialized,
/// so a batch taken before a delete is persisted before the delete reaches
/// storage and cannot bring the deleted counter back.
pub struct ClickStatsAggregator<S: StatsRepository + ?Sized> {
    repository: Arc<S>,
    counters: Mutex<Counters>,
    io: tokio::sync::Mutex<()>,
}

impl<S: StatsRepository + ?Sized> ClickStatsAggregator<S> {
    pub fn new(repository: Arc<S>) -> Self {
        Self {
            repository,
            counters: Mutex::new(Counters::default()),
            io: tokio::sync::Mutex::new(()),
        }
    }

    /// Replaces the in-memory totals with the persisted ones and clears any
    /// pending deltas.
    ///
    /// # Errors
    ///
    /// Returns the storage error; counters are left untouched in that case.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        let clicks = self.repository.load_stats().await?;
        info!(links = clicks.len(), "Loaded click stats");

        let mut counters = self.counters.lock();
        counters.clicks = clicks;
        counters.dirty.clear();
        Ok(())
    }

    pub fn record_click(&self, short: &str) {
        let id = link_id(short);
        let mut counters = self.counters.lock();
        *counters.clicks.entry(id.clone()).or_default() += 1;
        *counters.dirty.entry(id).or_default() += 1;
    }

    /// Persists pending deltas and returns how many links were written.
    ///
    /// A failed batch is logged and dropped, not retried.
    ///
    /// # Errors
    ///
    /// Returns the storage error of the failed batch.
    pub async fn flush(&self) -> Result<usize, StorageError> {
        let _io = self.io.lock().await;
        let batch = {
            let mut counters = self.counters.lock();
            if counters.dirty.is_empty() {
                return Ok(0);
            }
            mem::take(&mut counters.dirty)
        };

        match self.repository.save_stats(&batch).await {
            Ok(()) => {
                debug!(links = batch.len(), "Flushed click stats");
                Ok(batch.len())
            }
            Err(e) => {
                let dropped: u64 = batch.values().sum();
                error!(error = %e, links = batch.len(), dropped, "Dropping click stats batch");
                Err(e)
            }
        }
    }

    /// Forgets every count for a link, in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns the storage error; the in-memory counts are removed regardless.
    pub async fn delete(&self, short: &str) -> Result<(), StorageError> {
        let id = link_id(short);
        let _io = self.io.lock().await;
        {
            let mut counters = self.counters.lock();
            counters.clicks.remove(&id);
            counters.dirty.remove(&id);
        }
        self.repository.delete_stats(&id).await
    }

    /// Number of links with clicks waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.counters.lock().dirty.len()
    }

    /// Point-in-time copy of the totals.
    pub fn snapshot(&self) -> ClickStats {
        self.counters.lock().clicks.clone()
    }

    /// Most clicked links, ties broken by name.
    pub fn top(&self, limit: usize) -> Vec<ClickCount> {
        let mut counts: Vec<ClickCount> = self
            .snapshot()
            .into_iter()
            .map(|(short, clicks)| ClickCount { short, clicks })
            .collect();

        counts.sort_by(|a, b| b.clicks.cmp(&a.clicks).then_with(|| a.short.cmp(&b.short)));
        counts.truncate(limit);
        counts
    }

    /// Flushes every `interval`, forever.
    pub async fn run_flush_loop(self: Arc<Self>, interval: Duration) {
        info!(interval_secs = interval.as_secs(), "Click stats flush loop started");

        loop {
            // Errors are logged by `flush` itself.
            let _ = self.flush().await;
            tokio::time::sleep(interval).await;
        }
    }
}
