use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use super::SessionStore;
use crate::error::{CoreError, Result};

/// Redis-backed liveness store.
///
/// `SETEX`/`GET`/`DEL` give the three primitives their required per-key
/// atomicity; TTL expiry is handled by Redis itself.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

impl RedisSessionStore {
    pub async fn new(redis_url: &str) -> Result<Self> {
        info!("Connecting to Redis session store at {}", redis_url);

        let client = redis::Client::open(redis_url)
            .map_err(|e| CoreError::Store(format!("Failed to create Redis client: {e}")))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CoreError::Store(format!("Failed to connect to Redis: {e}")))?;

        info!("Successfully connected to Redis session store");

        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        debug!("Session SET: {} (TTL: {:?})", key, ttl);

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(|e| CoreError::Store(format!("Redis SETEX failed: {e}")))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        debug!("Session GET: {}", key);

        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CoreError::Store(format!("Redis GET failed: {e}")))?;

        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        debug!("Session DELETE: {}", key);

        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CoreError::Store(format!("Redis DEL failed: {e}")))?;

        Ok(())
    }
}
