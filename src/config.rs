//! Configuration for the status aggregation pipeline

use serde::{Deserialize, Serialize};

/// Tunable knobs for status aggregation. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Maximum age of a record kept in a monitored time-window category.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: i64,

    /// Width of the "last hour" windowed count.
    #[serde(default = "default_hour_window_secs")]
    pub hour_window_secs: i64,

    /// Histogram cap; load-time samples at or above it land in one bucket.
    #[serde(default = "default_load_time_cap")]
    pub load_time_cap: u64,

    /// Maximum length of the recent-activity lists.
    #[serde(default = "default_recent_cap")]
    pub recent_cap: u64,
}

fn default_retention_secs() -> i64 {
    60 * 60 * 24
}

fn default_hour_window_secs() -> i64 {
    60 * 60
}

fn default_load_time_cap() -> u64 {
    1000
}

fn default_recent_cap() -> u64 {
    50
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            hour_window_secs: default_hour_window_secs(),
            load_time_cap: default_load_time_cap(),
            recent_cap: default_recent_cap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: StatusConfig = serde_json::from_str("{}").expect("empty config");
        assert_eq!(config, StatusConfig::default());
        assert_eq!(config.retention_secs, 86_400);
        assert_eq!(config.load_time_cap, 1000);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: StatusConfig =
            serde_json::from_str(r#"{"retention_secs": 3600, "recent_cap": 10}"#).expect("config");
        assert_eq!(config.retention_secs, 3600);
        assert_eq!(config.recent_cap, 10);
        assert_eq!(config.hour_window_secs, 3600);
    }
}
