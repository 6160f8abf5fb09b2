//! Status snapshot model and the pure reshaping steps that feed it

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::store::types::{HealthReport, RecentMatch};

/// Pending depth of each job queue the pipeline drains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDepths {
    pub full_history: u64,
    pub game_coordinator: u64,
    pub mmr: u64,
    pub parse: u64,
}

/// One row of the retriever activity grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieverCount {
    pub hostname: String,
    pub count: u64,
}

/// Point-in-time operational report over the processing pipeline.
///
/// Built fresh per request, never mutated after construction, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Size of the tracked-visitor set.
    pub user_players: u64,
    /// Size of the tracked-player set.
    pub tracked_players: u64,
    /// Server errors over the retention horizon.
    pub error_500: u64,
    pub matches_last_day: u64,
    pub matches_last_hour: u64,
    pub user_matches_last_day: u64,
    pub retriever_matches_last_day: u64,
    pub parsed_matches_last_day: u64,
    pub requests_last_day: u64,
    pub api_hits: u64,
    pub queue: QueueDepths,
    /// Last-hour retriever activity grouped by host, ascending by hostname.
    pub retrievers: Vec<RetrieverCount>,
    /// Load-time frequency histogram; the top bucket aggregates "cap or
    /// above".
    pub load_times: BTreeMap<u64, u64>,
    pub health: HashMap<String, HealthReport>,
    pub last_added: Vec<RecentMatch>,
    pub last_parsed: Vec<RecentMatch>,
}

/// Frequency histogram over load-time samples with values clamped to `cap`.
pub(crate) fn load_time_counts(samples: &[u64], cap: u64) -> BTreeMap<u64, u64> {
    let mut counts = BTreeMap::new();
    for &sample in samples {
        *counts.entry(sample.min(cap)).or_insert(0) += 1;
    }
    counts
}

/// Group last-hour retriever records by worker and reshape to per-host rows.
///
/// Each record is keyed by the substring before its first `_`; tallies are
/// then reshaped to the key's hostname (substring before the first `.`) and
/// sorted ascending by hostname. Tallying in a `BTreeMap` keeps the output
/// deterministic when two keys collapse to one hostname.
pub(crate) fn group_retrievers(records: &[String]) -> Vec<RetrieverCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        let key = record.split('_').next().unwrap_or(record.as_str());
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut rows: Vec<RetrieverCount> = counts
        .into_iter()
        .map(|(key, count)| RetrieverCount {
            hostname: key.split('.').next().unwrap_or(key).to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| a.hostname.cmp(&b.hostname));
    rows
}
