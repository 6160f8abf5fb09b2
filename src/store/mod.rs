//! Store capability layer
//!
//! This module provides the abstract read/write contracts the pipeline
//! shares with its operational stores, plus the backends that implement
//! them: an in-memory backend for tests and local runs, and a redis backend
//! (feature `redis`) for production.

pub mod backends;
pub mod error;
pub mod traits;
pub mod types;

pub use backends::MemoryBackend;
#[cfg(feature = "redis")]
pub use backends::{RedisBackend, RedisConfig};
pub use error::{StoreError, StoreResult};
pub use traits::{
    HealthRegistry, QueueInterface, RecentList, SampleList, StatusBackend, TimeWindowStore,
};
pub use types::{decode_json, HealthReport, RecentMatch};

/// Names of the shared store collections, as written by the pipeline stages.
pub mod keys {
    /// All-time set of site visitors.
    pub const VISITORS: &str = "visitors";
    /// All-time set of tracked players.
    pub const TRACKED: &str = "tracked";
    /// Server errors, last day.
    pub const ERROR_500: &str = "error_500";
    /// Matches added for processing.
    pub const ADDED_MATCH: &str = "added_match";
    /// Matches requested by visitors.
    pub const VISITOR_MATCH: &str = "visitor_match";
    /// Replay retriever activity markers.
    pub const RETRIEVER: &str = "retriever";
    /// Parser activity markers.
    pub const PARSER: &str = "parser";
    /// Generic request log.
    pub const REQUESTS: &str = "requests";
    /// External API hits.
    pub const API_HITS: &str = "api_hits";

    /// Full-history fetch queue.
    pub const FH_QUEUE: &str = "fhQueue";
    /// Game-coordinator queue.
    pub const GC_QUEUE: &str = "gcQueue";
    /// MMR fetch queue.
    pub const MMR_QUEUE: &str = "mmrQueue";
    /// Replay parse queue.
    pub const PARSE_QUEUE: &str = "parse";

    /// Most recently added matches.
    pub const LAST_ADDED: &str = "matches_last_added";
    /// Most recently parsed matches.
    pub const LAST_PARSED: &str = "matches_last_parsed";
    /// Page load-time samples.
    pub const LOAD_TIMES: &str = "load_times";
    /// Health registry hash.
    pub const HEALTH: &str = "health";
}

/// Time-window categories pruned to the retention horizon on every
/// aggregation. `visitors` and `tracked` are all-time sets and never pruned.
pub const MONITORED_CATEGORIES: [&str; 7] = [
    keys::ADDED_MATCH,
    keys::ERROR_500,
    keys::API_HITS,
    keys::PARSER,
    keys::RETRIEVER,
    keys::VISITOR_MATCH,
    keys::REQUESTS,
];
