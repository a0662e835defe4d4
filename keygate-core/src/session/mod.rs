//! Session liveness store
//!
//! Maps each subject to its single currently-live token under a TTL. The
//! store only needs three individually-atomic primitives; no multi-key
//! transactions. Concurrent writes for one subject are last-writer-wins,
//! which matches the advisory nature of sessions.

mod memory;
mod redis;

pub use memory::MemorySessionStore;
pub use redis::RedisSessionStore;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Port for the liveness store backing issued tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`. Overwrites any
    /// existing entry, resetting its TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Fetch the live value for `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct SessionKeys;

impl SessionKeys {
    pub fn token(username: &str) -> String {
        format!("token:{username}")
    }
}
