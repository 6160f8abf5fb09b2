//! Store backend implementations

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{RedisBackend, RedisConfig};
