//! # Matchpulse
//!
//! Derivation layer for a match-analytics backend. Consumes decoded replay
//! event streams and shared operational stores, and produces per-match
//! metadata plus a point-in-time status snapshot of the processing pipeline.
//!
//! ## Modules
//!
//! - `config` - Tunable knobs for the status aggregation pipeline
//! - `logging` - Tracing initialization for embedding services
//! - `metadata` - Single-pass metadata extraction from decoded event streams
//! - `status` - Status snapshot assembly over the shared stores
//! - `store` - Abstract store capabilities with memory and redis backends
pub mod config;
pub mod logging;
pub mod metadata;
pub mod status;
pub mod store;
