//! In-memory store backend for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::store::error::StoreResult;
use crate::store::traits::*;

/// In-memory store backend.
///
/// Score collections keep sorted-set semantics: members stay ordered by
/// score and re-adding a member updates its score in place.
#[derive(Default)]
pub struct MemoryBackend {
    scored: Arc<RwLock<HashMap<String, Vec<(String, i64)>>>>,
    queues: Arc<RwLock<HashMap<String, Vec<String>>>>,
    health: Arc<RwLock<HashMap<String, String>>>,
    lists: Arc<RwLock<HashMap<String, Vec<String>>>>,
    samples: Arc<RwLock<Vec<u64>>>,
}

impl MemoryBackend {
    /// Create a new memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a job payload, growing the named queue's pending length.
    pub async fn enqueue(&self, queue: &str, payload: &str) {
        self.queues
            .write()
            .await
            .entry(queue.to_string())
            .or_default()
            .push(payload.to_string());
    }
}

#[async_trait]
impl TimeWindowStore for MemoryBackend {
    async fn add(&self, category: &str, member: &str, timestamp: i64) -> StoreResult<()> {
        let mut scored = self.scored.write().await;
        let entries = scored.entry(category.to_string()).or_default();
        entries.retain(|(m, _)| m != member);
        let at = entries.partition_point(|(_, score)| *score <= timestamp);
        entries.insert(at, (member.to_string(), timestamp));
        Ok(())
    }

    async fn prune(&self, category: &str, cutoff: i64) -> StoreResult<()> {
        let mut scored = self.scored.write().await;
        if let Some(entries) = scored.get_mut(category) {
            entries.retain(|(_, score)| *score >= cutoff);
        }
        Ok(())
    }

    async fn card(&self, category: &str) -> StoreResult<u64> {
        let scored = self.scored.read().await;
        Ok(scored.get(category).map_or(0, |e| e.len() as u64))
    }

    async fn count(&self, category: &str, lo: i64, hi: i64) -> StoreResult<u64> {
        let scored = self.scored.read().await;
        Ok(scored.get(category).map_or(0, |entries| {
            entries
                .iter()
                .filter(|(_, score)| (lo..=hi).contains(score))
                .count() as u64
        }))
    }

    async fn range_by_score(&self, category: &str, lo: i64, hi: i64) -> StoreResult<Vec<String>> {
        let scored = self.scored.read().await;
        Ok(scored.get(category).map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .filter(|(_, score)| (lo..=hi).contains(score))
                .map(|(member, _)| member.clone())
                .collect()
        }))
    }
}

#[async_trait]
impl QueueInterface for MemoryBackend {
    async fn len(&self, queue: &str) -> StoreResult<u64> {
        let queues = self.queues.read().await;
        Ok(queues.get(queue).map_or(0, |jobs| jobs.len() as u64))
    }
}

#[async_trait]
impl HealthRegistry for MemoryBackend {
    async fn set(&self, component: &str, serialized: &str) -> StoreResult<()> {
        self.health
            .write()
            .await
            .insert(component.to_string(), serialized.to_string());
        Ok(())
    }

    async fn get_all(&self) -> StoreResult<HashMap<String, String>> {
        Ok(self.health.read().await.clone())
    }
}

#[async_trait]
impl RecentList for MemoryBackend {
    async fn push(&self, list: &str, serialized: &str, cap: u64) -> StoreResult<()> {
        let mut lists = self.lists.write().await;
        let entries = lists.entry(list.to_string()).or_default();
        entries.insert(0, serialized.to_string());
        entries.truncate(cap as usize);
        Ok(())
    }

    async fn get_range(&self, list: &str) -> StoreResult<Vec<String>> {
        let lists = self.lists.read().await;
        Ok(lists.get(list).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SampleList for MemoryBackend {
    async fn push(&self, sample: u64, cap: u64) -> StoreResult<()> {
        let mut samples = self.samples.write().await;
        samples.insert(0, sample);
        samples.truncate(cap as usize);
        Ok(())
    }

    async fn get_all(&self) -> StoreResult<Vec<u64>> {
        Ok(self.samples.read().await.clone())
    }
}

impl StatusBackend for MemoryBackend {
    fn time_windows(&self) -> &dyn TimeWindowStore {
        self
    }

    fn queues(&self) -> &dyn QueueInterface {
        self
    }

    fn health(&self) -> &dyn HealthRegistry {
        self
    }

    fn recent(&self) -> &dyn RecentList {
        self
    }

    fn samples(&self) -> &dyn SampleList {
        self
    }
}
