//! Write-side helpers pipeline stages use to feed the shared stores
//!
//! Stages mark their activity through these instead of talking to a backend
//! directly, which keeps call sites decoupled from store details and the
//! category names in one place.

use crate::store::types::RecentMatch;
use crate::store::{StatusBackend, StoreError, StoreResult};

/// Record one timestamped marker in a time-window category.
pub async fn mark_event(
    backend: &dyn StatusBackend,
    category: &str,
    member: &str,
    now: i64,
) -> StoreResult<()> {
    backend.time_windows().add(category, member, now).await
}

/// Push a match onto one of the capped recent-activity lists.
pub async fn push_recent(
    backend: &dyn StatusBackend,
    list: &str,
    entry: &RecentMatch,
    cap: u64,
) -> StoreResult<()> {
    let serialized = serde_json::to_string(entry)
        .map_err(|e| StoreError::decode(format!("{}[]", list), e))?;
    backend.recent().push(list, &serialized, cap).await
}

/// Record one page load-time sample for the status histogram.
pub async fn record_load_time(
    backend: &dyn StatusBackend,
    millis: u64,
    cap: u64,
) -> StoreResult<()> {
    backend.samples().push(millis, cap).await
}
