//! Integration tests for status snapshot assembly over the memory backend

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use matchpulse::config::StatusConfig;
use matchpulse::status::{mark_event, push_recent, record_load_time, StatusAggregator};
use matchpulse::store::{
    keys, HealthRegistry, HealthReport, MemoryBackend, QueueInterface, RecentList, RecentMatch,
    SampleList, StatusBackend, StoreError, StoreResult, TimeWindowStore,
};

const NOW: i64 = 1_700_000_000;

fn hour_ago(secs_into_hour: i64) -> i64 {
    NOW - secs_into_hour
}

/// Populate a backend the way the pipeline stages would over a day.
async fn seed_backend(backend: &MemoryBackend) -> Result<()> {
    for (visitor, at) in [("v1", 10), ("v2", 20), ("v3", 30)] {
        mark_event(backend, keys::VISITORS, visitor, at).await?;
    }
    for (player, at) in [("p1", 10), ("p2", 20)] {
        mark_event(backend, keys::TRACKED, player, at).await?;
    }

    mark_event(backend, keys::ERROR_500, "e1", hour_ago(7200)).await?;

    // two matches in the last hour, one earlier today, one stale
    mark_event(backend, keys::ADDED_MATCH, "m1", hour_ago(120)).await?;
    mark_event(backend, keys::ADDED_MATCH, "m2", hour_ago(300)).await?;
    mark_event(backend, keys::ADDED_MATCH, "m3", hour_ago(7200)).await?;
    mark_event(backend, keys::ADDED_MATCH, "m0", NOW - 90_000).await?;

    mark_event(backend, keys::VISITOR_MATCH, "vm1", hour_ago(600)).await?;

    for (worker, at) in [
        ("hostA.x_1", hour_ago(60)),
        ("hostA.x_2", hour_ago(90)),
        ("hostB.y_3", hour_ago(120)),
        ("hostC.z_4", hour_ago(7200)),
    ] {
        mark_event(backend, keys::RETRIEVER, worker, at).await?;
    }

    for (job, at) in [("j1", hour_ago(100)), ("j2", hour_ago(200))] {
        mark_event(backend, keys::PARSER, job, at).await?;
    }
    for i in 0..5i64 {
        mark_event(backend, keys::REQUESTS, &format!("r{}", i), hour_ago(i * 60)).await?;
    }
    for (hit, at) in [("a1", 100), ("a2", 200)] {
        mark_event(backend, keys::API_HITS, hit, hour_ago(at)).await?;
    }

    backend.enqueue(keys::FH_QUEUE, "{\"account_id\":1}").await;
    for id in [10, 11] {
        backend
            .enqueue(keys::MMR_QUEUE, &format!("{{\"match_id\":{}}}", id))
            .await;
    }
    for id in [20, 21, 22] {
        backend
            .enqueue(keys::PARSE_QUEUE, &format!("{{\"match_id\":{}}}", id))
            .await;
    }

    for (component, metric) in [("parse_queue", 3u64), ("seq_num_delay", 12)] {
        let report = HealthReport {
            metric,
            threshold: 100,
            timestamp: NOW,
        };
        backend
            .set(component, &serde_json::to_string(&report)?)
            .await?;
    }

    for match_id in [1781962623, 1781962624] {
        push_recent(
            backend,
            keys::LAST_ADDED,
            &RecentMatch {
                match_id,
                duration: Some(2400),
                start_time: Some(NOW - 3000),
            },
            50,
        )
        .await?;
    }
    push_recent(
        backend,
        keys::LAST_PARSED,
        &RecentMatch {
            match_id: 1781962623,
            duration: Some(2400),
            start_time: Some(NOW - 3000),
        },
        50,
    )
    .await?;

    for sample in [100u64, 2000, 999, 1000, 1500] {
        record_load_time(backend, sample, 100).await?;
    }

    Ok(())
}

#[tokio::test]
async fn snapshot_assembles_every_section() -> Result<()> {
    let backend = Arc::new(MemoryBackend::new());
    seed_backend(&backend).await?;

    let aggregator = StatusAggregator::new(backend.clone(), StatusConfig::default());
    let snapshot = aggregator.snapshot_at(NOW).await?;

    assert_eq!(snapshot.user_players, 3);
    assert_eq!(snapshot.tracked_players, 2);
    assert_eq!(snapshot.error_500, 1);
    // the stale marker is pruned before counting
    assert_eq!(snapshot.matches_last_day, 3);
    assert_eq!(snapshot.matches_last_hour, 2);
    assert_eq!(snapshot.user_matches_last_day, 1);
    assert_eq!(snapshot.retriever_matches_last_day, 4);
    assert_eq!(snapshot.parsed_matches_last_day, 2);
    assert_eq!(snapshot.requests_last_day, 5);
    assert_eq!(snapshot.api_hits, 2);

    assert_eq!(snapshot.queue.full_history, 1);
    assert_eq!(snapshot.queue.game_coordinator, 0);
    assert_eq!(snapshot.queue.mmr, 2);
    assert_eq!(snapshot.queue.parse, 3);

    // only last-hour retriever activity is grouped
    assert_eq!(snapshot.retrievers.len(), 2);
    assert_eq!(snapshot.retrievers[0].hostname, "hostA");
    assert_eq!(snapshot.retrievers[0].count, 2);
    assert_eq!(snapshot.retrievers[1].hostname, "hostB");
    assert_eq!(snapshot.retrievers[1].count, 1);

    assert_eq!(snapshot.load_times.get(&100), Some(&1));
    assert_eq!(snapshot.load_times.get(&999), Some(&1));
    assert_eq!(snapshot.load_times.get(&1000), Some(&3));

    assert_eq!(snapshot.health.len(), 2);
    assert!(snapshot.health["parse_queue"].is_healthy());

    assert_eq!(snapshot.last_added.len(), 2);
    assert_eq!(snapshot.last_added[0].match_id, 1781962624);
    assert_eq!(snapshot.last_parsed.len(), 1);

    Ok(())
}

#[tokio::test]
async fn repeated_snapshots_are_stable() -> Result<()> {
    let backend = Arc::new(MemoryBackend::new());
    seed_backend(&backend).await?;

    let aggregator = StatusAggregator::new(backend.clone(), StatusConfig::default());
    let first = aggregator.snapshot_at(NOW).await?;
    let second = aggregator.snapshot_at(NOW).await?;

    assert_eq!(first.matches_last_day, second.matches_last_day);
    assert_eq!(first.retrievers, second.retrievers);
    assert_eq!(first.load_times, second.load_times);
    Ok(())
}

#[tokio::test]
async fn empty_backend_yields_zeroed_snapshot() -> Result<()> {
    let backend = Arc::new(MemoryBackend::new());
    let aggregator = StatusAggregator::new(backend, StatusConfig::default());
    let snapshot = aggregator.snapshot_at(NOW).await?;

    assert_eq!(snapshot.user_players, 0);
    assert_eq!(snapshot.matches_last_hour, 0);
    assert!(snapshot.retrievers.is_empty());
    assert!(snapshot.load_times.is_empty());
    assert!(snapshot.health.is_empty());
    assert!(snapshot.last_added.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_health_blob_fails_the_aggregation() -> Result<()> {
    let backend = Arc::new(MemoryBackend::new());
    backend.set("parse_queue", "not json").await?;

    let aggregator = StatusAggregator::new(backend, StatusConfig::default());
    let err = aggregator
        .snapshot_at(NOW)
        .await
        .expect_err("snapshot should fail");
    assert!(err.is_decode());
    Ok(())
}

#[tokio::test]
async fn snapshot_serializes_for_the_dashboard() -> Result<()> {
    let backend = Arc::new(MemoryBackend::new());
    seed_backend(&backend).await?;

    let aggregator = StatusAggregator::new(backend, StatusConfig::default());
    let snapshot = aggregator.snapshot_at(NOW).await?;

    let value: serde_json::Value = serde_json::to_value(&snapshot)?;
    assert_eq!(value["queue"]["parse"], 3);
    assert_eq!(value["retrievers"][0]["hostname"], "hostA");
    assert_eq!(value["load_times"]["1000"], 3);
    Ok(())
}

struct FailingQueues;

#[async_trait]
impl QueueInterface for FailingQueues {
    async fn len(&self, _queue: &str) -> StoreResult<u64> {
        Err(StoreError::unavailable("queue engine down"))
    }
}

/// Memory backend with the queue engine unreachable.
struct QueueOutageBackend {
    inner: MemoryBackend,
    queues: FailingQueues,
}

impl StatusBackend for QueueOutageBackend {
    fn time_windows(&self) -> &dyn TimeWindowStore {
        &self.inner
    }

    fn queues(&self) -> &dyn QueueInterface {
        &self.queues
    }

    fn health(&self) -> &dyn HealthRegistry {
        &self.inner
    }

    fn recent(&self) -> &dyn RecentList {
        &self.inner
    }

    fn samples(&self) -> &dyn SampleList {
        &self.inner
    }
}

#[tokio::test]
async fn failed_queue_read_fails_the_whole_aggregation() -> Result<()> {
    let inner = MemoryBackend::new();
    seed_backend(&inner).await?;

    let backend = Arc::new(QueueOutageBackend {
        inner,
        queues: FailingQueues,
    });
    let aggregator = StatusAggregator::new(backend, StatusConfig::default());

    let err = aggregator
        .snapshot_at(NOW)
        .await
        .expect_err("aggregation should fail atomically");
    assert!(err.is_retryable());
    assert!(err.to_string().contains("queue engine down"));
    Ok(())
}

#[tokio::test]
async fn concurrent_aggregations_agree() -> Result<()> {
    let backend = Arc::new(MemoryBackend::new());
    seed_backend(&backend).await?;

    let aggregator = Arc::new(StatusAggregator::new(
        backend.clone(),
        StatusConfig::default(),
    ));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let aggregator = Arc::clone(&aggregator);
        handles.push(tokio::spawn(async move { aggregator.snapshot_at(NOW).await }));
    }

    let mut results: Vec<HashMap<String, HealthReport>> = Vec::new();
    for handle in handles {
        let snapshot = handle.await??;
        assert_eq!(snapshot.matches_last_day, 3);
        results.push(snapshot.health);
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    Ok(())
}
