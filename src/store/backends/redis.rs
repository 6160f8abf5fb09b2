//! Redis store backend implementation

use async_trait::async_trait;
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::store::error::{StoreError, StoreResult};
use crate::store::keys;
use crate::store::traits::*;

/// Redis backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Prefix applied to every key
    #[serde(default)]
    pub key_prefix: String,
}

fn default_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_pool_size() -> usize {
    16
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            pool_size: default_pool_size(),
            key_prefix: String::new(),
        }
    }
}

/// Redis store backend
pub struct RedisBackend {
    pool: Pool,
    key_prefix: String,
}

impl RedisBackend {
    /// Create a new redis backend and verify the connection
    pub async fn connect(config: &RedisConfig) -> StoreResult<Self> {
        info!("Initializing redis store backend");

        let mut pool_config = Config::from_url(&config.url);
        let mut p = PoolConfig::new(config.pool_size);
        p.timeouts.wait = Some(std::time::Duration::from_secs(10));
        p.timeouts.create = Some(std::time::Duration::from_secs(10));
        p.timeouts.recycle = Some(std::time::Duration::from_secs(10));
        pool_config.pool = Some(p);

        let pool = pool_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::connection(format!("Failed to create redis pool: {}", e)))?;

        // verify the server is reachable before handing the pool out
        let conn = pool
            .get()
            .await
            .map_err(|e| StoreError::connection(format!("Failed to connect to redis: {}", e)))?;
        drop(conn);

        Ok(Self {
            pool,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Generate key with prefix
    fn make_key(&self, name: &str) -> String {
        format!("{}{}", self.key_prefix, name)
    }

    async fn conn(&self) -> StoreResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))
    }
}

#[async_trait]
impl TimeWindowStore for RedisBackend {
    async fn add(&self, category: &str, member: &str, timestamp: i64) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: () = conn
            .zadd(self.make_key(category), member, timestamp)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Ok(())
    }

    async fn prune(&self, category: &str, cutoff: i64) -> StoreResult<()> {
        debug!("Pruning {} below {}", category, cutoff);

        let mut conn = self.conn().await?;
        // exclusive upper bound: members scored exactly at the cutoff survive
        let _: () = conn
            .zrembyscore(self.make_key(category), "-inf", format!("({}", cutoff))
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Ok(())
    }

    async fn card(&self, category: &str) -> StoreResult<u64> {
        let mut conn = self.conn().await?;
        conn.zcard(self.make_key(category))
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }

    async fn count(&self, category: &str, lo: i64, hi: i64) -> StoreResult<u64> {
        let mut conn = self.conn().await?;
        conn.zcount(self.make_key(category), lo, hi)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }

    async fn range_by_score(&self, category: &str, lo: i64, hi: i64) -> StoreResult<Vec<String>> {
        let mut conn = self.conn().await?;
        conn.zrangebyscore(self.make_key(category), lo, hi)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }
}

#[async_trait]
impl QueueInterface for RedisBackend {
    async fn len(&self, queue: &str) -> StoreResult<u64> {
        let mut conn = self.conn().await?;
        conn.llen(self.make_key(queue))
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }
}

#[async_trait]
impl HealthRegistry for RedisBackend {
    async fn set(&self, component: &str, serialized: &str) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: () = conn
            .hset(self.make_key(keys::HEALTH), component, serialized)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Ok(())
    }

    async fn get_all(&self) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.conn().await?;
        conn.hgetall(self.make_key(keys::HEALTH))
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }
}

#[async_trait]
impl RecentList for RedisBackend {
    async fn push(&self, list: &str, serialized: &str, cap: u64) -> StoreResult<()> {
        let key = self.make_key(list);
        let mut conn = self.conn().await?;
        let _: () = conn
            .lpush(&key, serialized)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        let _: () = conn
            .ltrim(&key, 0, cap as isize - 1)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Ok(())
    }

    async fn get_range(&self, list: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn().await?;
        conn.lrange(self.make_key(list), 0, -1)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }
}

#[async_trait]
impl SampleList for RedisBackend {
    async fn push(&self, sample: u64, cap: u64) -> StoreResult<()> {
        let key = self.make_key(keys::LOAD_TIMES);
        let mut conn = self.conn().await?;
        let _: () = conn
            .lpush(&key, sample)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        let _: () = conn
            .ltrim(&key, 0, cap as isize - 1)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Ok(())
    }

    async fn get_all(&self) -> StoreResult<Vec<u64>> {
        let mut conn = self.conn().await?;
        conn.lrange(self.make_key(keys::LOAD_TIMES), 0, -1)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))
    }
}

impl StatusBackend for RedisBackend {
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
