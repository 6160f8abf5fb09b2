//! Declared schemas for records stored in serialized form
//!
//! Every blob read back from a store goes through [`decode_json`] against one
//! of these schemas; a mismatch surfaces as [`StoreError::Decode`] instead of
//! leaking a half-parsed value downstream.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{StoreError, StoreResult};

/// Health report written by a subsystem's health probe.
///
/// `metric` is the probed value, `threshold` the level above which the
/// subsystem counts as unhealthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub metric: u64,
    pub threshold: u64,
    pub timestamp: i64,
}

impl HealthReport {
    /// Whether the probed value is within its threshold.
    pub fn is_healthy(&self) -> bool {
        self.metric <= self.threshold
    }
}

/// One entry of the capped recent-activity lists (added / parsed matches).
///
/// Writers newer than the reader may include fields we do not model; readers
/// older than the writer may find fields missing. Both directions stay
/// decodable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMatch {
    pub match_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
}

/// Decode a stored serialized value against its declared schema.
pub fn decode_json<T: DeserializeOwned>(context: &str, raw: &str) -> StoreResult<T> {
    serde_json::from_str(raw).map_err(|e| StoreError::decode(context, e))
}
