use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use quire::domain::KeyTtl;
use quire::ports::{CacheBackend, CacheConnector};
use shared::{Error, Result, TtlSecs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct StoredValue {
    value: String,
    ttl: Option<Duration>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    // A deadline past the clock's range is kept as no expiry.
    fn new(value: String, ttl: Option<TtlSecs>) -> Self {
        let ttl = ttl.map(TtlSecs::as_duration);
        let expires_at = ttl.and_then(|d| Instant::now().checked_add(d));
        Self {
            value,
            ttl: expires_at.and(ttl),
            expires_at,
        }
    }
}

/// Per-entry expiry. A write without TTL clears any previous expiry, like Redis `SET`.
struct EntryExpiry;

impl Expiry<String, StoredValue> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Moka-based cache backend with per-entry TTL support.
/// Stands in for Redis where no server is available.
#[derive(Clone)]
pub struct MokaCache {
    cache: Cache<String, StoredValue>,
    online: Arc<AtomicBool>,
}

impl MokaCache {
    /// Create a new unbounded Moka cache
    pub fn new_unbounded() -> Self {
        Self {
            cache: Cache::builder().expire_after(EntryExpiry).build(),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulates a dropped connection: while offline every call fails with `CacheUnavailable`.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::CacheUnavailable)
        }
    }
}

#[async_trait]
impl CacheBackend for MokaCache {
    async fn ping(&self) -> Result<String> {
        self.check()?;
        Ok("PONG".to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.cache.get(key).await.map(|stored| stored.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<TtlSecs>) -> Result<()> {
        self.check()?;
        self.cache
            .insert(key.to_string(), StoredValue::new(value.to_string(), ttl))
            .await;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: TtlSecs) -> Result<bool> {
        self.check()?;
        match self.cache.get(key).await {
            Some(stored) => {
                self.cache
                    .insert(key.to_string(), StoredValue::new(stored.value, Some(ttl)))
                    .await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.check()?;
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        self.check()?;
        Ok(match self.cache.get(key).await {
            None => KeyTtl::Missing,
            Some(StoredValue {
                expires_at: None, ..
            }) => KeyTtl::Persistent,
            Some(StoredValue {
                expires_at: Some(deadline),
                ..
            }) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                KeyTtl::Expires(remaining.as_millis().div_ceil(1000) as u64)
            }
        })
    }
}

impl std::fmt::Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("online", &self.online.load(Ordering::SeqCst))
            .finish()
    }
}

/// Hands out a shared [`MokaCache`] while reachable
pub struct MokaConnector {
    cache: MokaCache,
    reachable: AtomicBool,
}

impl MokaConnector {
    pub fn new(cache: MokaCache) -> Self {
        Self {
            cache,
            reachable: AtomicBool::new(true),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn cache(&self) -> &MokaCache {
        &self.cache
    }
}

#[async_trait]
impl CacheConnector for MokaConnector {
    async fn connect(&self) -> Result<Arc<dyn CacheBackend>> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(Error::Cache("connection refused".to_string()));
        }
        self.cache.set_online(true);
        Ok(Arc::new(self.cache.clone()))
    }
}
