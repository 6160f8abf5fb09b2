//! Core trait definitions for the store capability layer
//!
//! Pipeline stages write timestamped markers into these capabilities; the
//! status aggregator reads them back. The stores themselves (redis in
//! production) are external; only their read/write contracts live here.

use async_trait::async_trait;

use super::error::StoreResult;

/// Append-only per-category store of (member, timestamp) pairs supporting
/// range counts, range queries, and pruning.
#[async_trait]
pub trait TimeWindowStore: Send + Sync {
    /// Append a member with its timestamp score. Re-adding a member updates
    /// its score.
    async fn add(&self, category: &str, member: &str, timestamp: i64) -> StoreResult<()>;

    /// Drop every member with score below the cutoff. Idempotent and
    /// commutative, so concurrent callers need no coordination.
    async fn prune(&self, category: &str, cutoff: i64) -> StoreResult<()>;

    /// Cardinality of a category.
    async fn card(&self, category: &str) -> StoreResult<u64>;

    /// Count of members with score in `[lo, hi]`, bounds inclusive.
    async fn count(&self, category: &str, lo: i64, hi: i64) -> StoreResult<u64>;

    /// Members with score in `[lo, hi]`, bounds inclusive, in score order.
    async fn range_by_score(&self, category: &str, lo: i64, hi: i64) -> StoreResult<Vec<String>>;
}

/// Pending-length lookup against the external job-queue engine.
#[async_trait]
pub trait QueueInterface: Send + Sync {
    /// Number of pending jobs in a named queue.
    async fn len(&self, queue: &str) -> StoreResult<u64>;
}

/// Per-subsystem serialized health blobs written by health probes.
#[async_trait]
pub trait HealthRegistry: Send + Sync {
    /// Store one component's serialized health report.
    async fn set(&self, component: &str, serialized: &str) -> StoreResult<()>;

    /// All stored blobs, raw. An empty registry is an empty map, not an
    /// error.
    async fn get_all(&self) -> StoreResult<std::collections::HashMap<String, String>>;
}

/// Capped recent-activity lists of serialized records.
#[async_trait]
pub trait RecentList: Send + Sync {
    /// Push a serialized record to the front of a list, trimming it to `cap`.
    async fn push(&self, list: &str, serialized: &str, cap: u64) -> StoreResult<()>;

    /// Every stored record, preserving stored order.
    async fn get_range(&self, list: &str) -> StoreResult<Vec<String>>;
}

/// Numeric load-time samples feeding the status histogram.
#[async_trait]
pub trait SampleList: Send + Sync {
    /// Record one sample, trimming the backlog to `cap` entries.
    async fn push(&self, sample: u64, cap: u64) -> StoreResult<()>;

    /// All retained samples.
    async fn get_all(&self) -> StoreResult<Vec<u64>>;
}

/// Unified handle over every capability the status aggregator consumes.
pub trait StatusBackend: Send + Sync {
    /// Get the time-window store implementation
    fn time_windows(&self) -> &dyn TimeWindowStore;

    /// Get the queue interface implementation
    fn queues(&self) -> &dyn QueueInterface;

    /// Get the health registry implementation
    fn health(&self) -> &dyn HealthRegistry;

    /// Get the recent-list implementation
    fn recent(&self) -> &dyn RecentList;

    /// Get the sample-list implementation
    fn samples(&self) -> &dyn SampleList;
}
