use crate::domain::{CacheEntry, CacheProbe, KeyTtl};
use crate::ports::{CacheBackend, CacheConnector};
use parking_lot::RwLock;
use shared::{Error, Result, TtlSecs};
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Observable connection state of the cache client
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Ready,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Ready => "ready",
        }
    }
}

// The backend handle only exists in the Ready state.
enum Connection {
    Disconnected,
    Connecting,
    Ready(Arc<dyn CacheBackend>),
}

impl Connection {
    fn state(&self) -> ConnectionState {
        match self {
            Connection::Disconnected => ConnectionState::Disconnected,
            Connection::Connecting => ConnectionState::Connecting,
            Connection::Ready(_) => ConnectionState::Ready,
        }
    }
}

/// Owns the single named cache connection and its state flag.
///
/// Every operation except [`CacheClient::probe`] fails with
/// [`Error::CacheUnavailable`] unless the connection is ready, so callers can
/// tell "no such key" apart from "cache unreachable".
pub struct CacheClient {
    name: String,
    connector: Option<Arc<dyn CacheConnector>>,
    connect_timeout: Duration,
    connection: RwLock<Connection>,
}

impl CacheClient {
    pub fn new(
        name: impl Into<String>,
        connector: Arc<dyn CacheConnector>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            connector: Some(connector),
            connect_timeout,
            connection: RwLock::new(Connection::Disconnected),
        }
    }

    /// A client with no configured endpoint. It never leaves `Disconnected`.
    pub fn disabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connector: None,
            connect_timeout: Duration::ZERO,
            connection: RwLock::new(Connection::Disconnected),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_configured(&self) -> bool {
        self.connector.is_some()
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.read().state()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ConnectionState::Ready
    }

    /// Makes one connection attempt. A no-op while already connecting or ready.
    pub async fn connect(&self) -> Result<()> {
        let connector = self.connector.clone().ok_or(Error::CacheUnavailable)?;

        {
            let mut connection = self.connection.write();
            match *connection {
                Connection::Connecting | Connection::Ready(_) => return Ok(()),
                Connection::Disconnected => *connection = Connection::Connecting,
            }
        }
        let _slot = ConnectingSlot(&self.connection);
        info!(cache = %self.name, "Connecting to cache");

        let attempt = match tokio::time::timeout(self.connect_timeout, connector.connect()).await {
            Ok(result) => result,
            Err(_) => Err(Error::Cache(format!(
                "connection attempt timed out after {:?}",
                self.connect_timeout
            ))),
        };

        match attempt {
            Ok(backend) => {
                *self.connection.write() = Connection::Ready(backend);
                info!(cache = %self.name, "Cache ready");
                Ok(())
            }
            Err(e) => {
                *self.connection.write() = Connection::Disconnected;
                warn!(cache = %self.name, error = %e, "Cache connection failed");
                Err(e)
            }
        }
    }

    /// Retries `connect` every `interval` while the client is disconnected.
    /// Returns `None` for a disabled client. The task ends once the client is dropped.
    pub fn spawn_reconnect(self: &Arc<Self>, interval: Duration) -> Option<JoinHandle<()>> {
        self.connector.as_ref()?;
        let weak: Weak<Self> = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(client) = weak.upgrade() else {
                    break;
                };
                if client.state() == ConnectionState::Disconnected {
                    debug!(cache = %client.name, "Attempting cache reconnect");
                    let _ = client.connect().await;
                }
            }
        }))
    }

    /// Connectivity probe. Never fails.
    pub async fn probe(&self) -> CacheProbe {
        let Ok(backend) = self.ready_backend() else {
            return CacheProbe::Disconnected;
        };

        match backend.ping().await {
            Ok(ping) => CacheProbe::Connected { ping },
            Err(e) => {
                warn!(cache = %self.name, error = %e, "Cache ping failed");
                self.demote(&backend);
                CacheProbe::Disconnected
            }
        }
    }

    /// `None` when the key is absent
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.guarded(|backend| async move { backend.get(key).await })
            .await
    }

    pub async fn set(&self, entry: &CacheEntry) -> Result<()> {
        debug!(key = %entry.key, ttl = ?entry.ttl, "Setting cache entry");
        self.guarded(|backend| async move {
            backend.set(&entry.key, &entry.value, entry.ttl).await
        })
        .await
    }

    /// Returns whether the key existed
    pub async fn expire(&self, key: &str, ttl: TtlSecs) -> Result<bool> {
        self.guarded(|backend| async move { backend.expire(key, ttl).await })
            .await
    }

    /// Idempotent; returns whether the key existed
    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.guarded(|backend| async move { backend.delete(key).await })
            .await
    }

    pub async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        self.guarded(|backend| async move { backend.ttl(key).await })
            .await
    }

    fn ready_backend(&self) -> Result<Arc<dyn CacheBackend>> {
        match &*self.connection.read() {
            Connection::Ready(backend) => Ok(Arc::clone(backend)),
            _ => Err(Error::CacheUnavailable),
        }
    }

    async fn guarded<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn CacheBackend>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let backend = self.ready_backend()?;
        match op(Arc::clone(&backend)).await {
            Err(Error::CacheUnavailable) => {
                self.demote(&backend);
                Err(Error::CacheUnavailable)
            }
            other => other,
        }
    }

    // Only the handle that failed is dropped; a newer connection stays in place.
    fn demote(&self, failed: &Arc<dyn CacheBackend>) {
        let mut connection = self.connection.write();
        if let Connection::Ready(current) = &*connection {
            if std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(failed)) {
                *connection = Connection::Disconnected;
                warn!(cache = %self.name, "Cache connection lost");
            }
        }
    }
}

// Releases the `Connecting` state if the attempt is dropped before it finishes.
struct ConnectingSlot<'a>(&'a RwLock<Connection>);

impl Drop for ConnectingSlot<'_> {
    fn drop(&mut self) {
        let mut connection = self.0.write();
        if matches!(*connection, Connection::Connecting) {
            *connection = Connection::Disconnected;
        }
    }
}

impl std::fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheClient")
            .field("name", &self.name)
            .field("configured", &self.is_configured())
            .field("state", &self.state().as_str())
            .finish()
    }
}
