use async_trait::async_trait;
use quire::domain::KeyTtl;
use quire::ports::{CacheBackend, CacheConnector};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use shared::config::CacheConfig;
use shared::{Error, Result, TtlSecs};
use std::sync::Arc;
use tracing::debug;

/// Opens Redis connections for the cache client
pub struct RedisConnector {
    client: Client,
}

impl RedisConnector {
    /// Validates the endpoint; does not connect.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let client = Client::open(config.connection_url())
            .map_err(|e| Error::Internal(format!("invalid Redis endpoint: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CacheConnector for RedisConnector {
    async fn connect(&self) -> Result<Arc<dyn CacheBackend>> {
        let manager = ConnectionManager::new(self.client.clone())
            .await
            .map_err(|e| Error::Cache(e.to_string()))?;
        debug!("Redis connection established");
        Ok(Arc::new(RedisCache { manager }))
    }
}

/// Redis-backed cache operations over a multiplexed connection
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn ping(&self) -> Result<String> {
        let mut conn = self.manager.clone();
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(reply)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<TtlSecs>) -> Result<()> {
        let mut conn = self.manager.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(ttl.secs());
        }
        let _: () = cmd.query_async(&mut conn).await.map_err(cache_error)?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: TtlSecs) -> Result<bool> {
        let mut conn = self.manager.clone();
        let applied: i64 = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl.secs())
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(applied == 1)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.manager.clone();
        let removed: i64 = conn.del(key).await.map_err(cache_error)?;
        Ok(removed > 0)
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        let mut conn = self.manager.clone();
        let reply: i64 = redis::cmd("TTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(KeyTtl::from_redis_reply(reply))
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("manager", &"<redis::aio::ConnectionManager>")
            .finish()
    }
}

/// Connection-class failures mean the cache is unreachable; anything else is an operation error.
fn cache_error(err: RedisError) -> Error {
    if err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_io_error()
        || err.is_timeout()
    {
        Error::CacheUnavailable
    } else {
        Error::Cache(err.to_string())
    }
}
