//! Status snapshot assembly over the shared stores
//!
//! The aggregator is a read-side observer of the pipeline: it prunes the
//! monitored time-window categories to the retention horizon, fans every
//! independent read out concurrently, and joins them into one
//! [`StatusSnapshot`], failing as a whole on the first read error. It never
//! coordinates with the writers it observes.

mod marks;
mod snapshot;

pub use marks::{mark_event, push_recent, record_load_time};
pub use snapshot::{QueueDepths, RetrieverCount, StatusSnapshot};

use chrono::Utc;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::StatusConfig;
use crate::store::types::{decode_json, HealthReport, RecentMatch};
use crate::store::{keys, StatusBackend, StoreResult, MONITORED_CATEGORIES};

use snapshot::{group_retrievers, load_time_counts};

/// Assembles status snapshots from the shared store capabilities.
pub struct StatusAggregator {
    backend: Arc<dyn StatusBackend>,
    config: StatusConfig,
}

impl StatusAggregator {
    /// Create a new status aggregator
    pub fn new(backend: Arc<dyn StatusBackend>, config: StatusConfig) -> Self {
        Self { backend, config }
    }

    /// Build a snapshot as of the current wall clock.
    pub async fn snapshot(&self) -> StoreResult<StatusSnapshot> {
        self.snapshot_at(Utc::now().timestamp()).await
    }

    /// Build a snapshot as of `now` (unix seconds).
    ///
    /// All reads succeed or the whole aggregation fails; a partial snapshot
    /// is never returned. Outstanding reads are dropped on the first
    /// failure.
    pub async fn snapshot_at(&self, now: i64) -> StoreResult<StatusSnapshot> {
        self.prune_expired(now).await?;

        debug!("Building status snapshot at {}", now);

        let tw = self.backend.time_windows();
        let hour_lo = now - self.config.hour_window_secs;

        let (
            user_players,
            tracked_players,
            error_500,
            matches_last_day,
            matches_last_hour,
            user_matches_last_day,
            retriever_matches_last_day,
            parsed_matches_last_day,
            requests_last_day,
            api_hits,
            queue,
            retrievers,
            load_times,
            health,
            last_added,
            last_parsed,
        ) = tokio::try_join!(
            tw.card(keys::VISITORS),
            tw.card(keys::TRACKED),
            tw.card(keys::ERROR_500),
            tw.card(keys::ADDED_MATCH),
            tw.count(keys::ADDED_MATCH, hour_lo, now),
            tw.card(keys::VISITOR_MATCH),
            tw.card(keys::RETRIEVER),
            tw.card(keys::PARSER),
            tw.card(keys::REQUESTS),
            tw.card(keys::API_HITS),
            self.read_queue_depths(),
            self.read_retrievers(hour_lo, now),
            self.read_load_times(),
            self.read_health(),
            self.read_recent(keys::LAST_ADDED),
            self.read_recent(keys::LAST_PARSED),
        )?;

        Ok(StatusSnapshot {
            user_players,
            tracked_players,
            error_500,
            matches_last_day,
            matches_last_hour,
            user_matches_last_day,
            retriever_matches_last_day,
            parsed_matches_last_day,
            requests_last_day,
            api_hits,
            queue,
            retrievers,
            load_times,
            health,
            last_added,
            last_parsed,
        })
    }

    /// Drop records older than the retention horizon from every monitored
    /// category. Idempotent and commutative, so concurrent aggregations are
    /// safe.
    async fn prune_expired(&self, now: i64) -> StoreResult<()> {
        let cutoff = now - self.config.retention_secs;
        let tw = self.backend.time_windows();
        try_join_all(
            MONITORED_CATEGORIES
                .into_iter()
                .map(|category| tw.prune(category, cutoff)),
        )
        .await?;
        Ok(())
    }

    async fn read_queue_depths(&self) -> StoreResult<QueueDepths> {
        let queues = self.backend.queues();
        let (full_history, game_coordinator, mmr, parse) = tokio::try_join!(
            queues.len(keys::FH_QUEUE),
            queues.len(keys::GC_QUEUE),
            queues.len(keys::MMR_QUEUE),
            queues.len(keys::PARSE_QUEUE),
        )?;
        Ok(QueueDepths {
            full_history,
            game_coordinator,
            mmr,
            parse,
        })
    }

    async fn read_retrievers(&self, lo: i64, hi: i64) -> StoreResult<Vec<RetrieverCount>> {
        let records = self
            .backend
            .time_windows()
            .range_by_score(keys::RETRIEVER, lo, hi)
            .await?;
        Ok(group_retrievers(&records))
    }

    async fn read_load_times(&self) -> StoreResult<std::collections::BTreeMap<u64, u64>> {
        let samples = self.backend.samples().get_all().await?;
        Ok(load_time_counts(&samples, self.config.load_time_cap))
    }

    async fn read_health(&self) -> StoreResult<HashMap<String, HealthReport>> {
        let raw = self.backend.health().get_all().await?;
        let mut reports = HashMap::with_capacity(raw.len());
        for (component, serialized) in raw {
            let report = decode_json(&format!("health[{}]", component), &serialized)?;
            reports.insert(component, report);
        }
        Ok(reports)
    }

    async fn read_recent(&self, list: &str) -> StoreResult<Vec<RecentMatch>> {
        let raw = self.backend.recent().get_range(list).await?;
        raw.iter()
            .map(|serialized| decode_json(&format!("{}[]", list), serialized))
            .collect()
    }
}
