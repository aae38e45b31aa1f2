use chrono::{DateTime, Utc};
use shared::TtlSecs;

/// Store-assigned identifier of a todo (`SERIAL`).
pub type TodoId = i32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
}

/// Full replacement of the mutable todo fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: String,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    pub ttl: Option<TtlSecs>,
}

/// Remaining lifetime of a cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyTtl {
    Missing,
    Persistent,
    Expires(u64),
}

impl KeyTtl {
    /// Interprets a Redis `TTL` reply: -2 missing, -1 no expiry.
    pub fn from_redis_reply(reply: i64) -> Self {
        match reply {
            -2 => KeyTtl::Missing,
            r if r < 0 => KeyTtl::Persistent,
            r => KeyTtl::Expires(r as u64),
        }
    }

    pub fn exists(&self) -> bool {
        !matches!(self, KeyTtl::Missing)
    }

    pub fn seconds(&self) -> Option<u64> {
        match self {
            KeyTtl::Expires(secs) => Some(*secs),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheProbe {
    Connected { ping: String },
    Disconnected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendStatus {
    Connected,
    Disconnected,
}

impl BackendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendStatus::Connected => "connected",
            BackendStatus::Disconnected => "disconnected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthReport {
    pub database: BackendStatus,
    pub database_time: Option<DateTime<Utc>>,
    pub cache: BackendStatus,
    pub error: Option<String>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
