use chrono::{DateTime, Utc};
use quire::{CacheProbe, HealthReport, KeyTtl, Todo};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i32,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            completed: todo.completed,
            created_at: todo.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
        }
    }

    pub fn for_field(error: impl Into<String>, field: &str) -> Self {
        Self {
            error: error.into(),
            field: Some(field.to_string()),
        }
    }
}

// === Cache Operation Models ===

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping: Option<String>,
}

impl From<CacheProbe> for ProbeResponse {
    fn from(probe: CacheProbe) -> Self {
        match probe {
            CacheProbe::Connected { ping } => Self {
                status: "connected",
                ping: Some(ping),
            },
            CacheProbe::Disconnected => Self {
                status: "disconnected",
                ping: None,
            },
        }
    }
}

/// `value` is serialized as `null` for an absent key
#[derive(Debug, Serialize)]
pub struct GetValueResponse {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KeyTtlResponse {
    pub key: String,
    pub exists: bool,
    pub ttl: Option<u64>,
}

impl KeyTtlResponse {
    pub fn new(key: String, ttl: KeyTtl) -> Self {
        Self {
            key,
            exists: ttl.exists(),
            ttl: ttl.seconds(),
        }
    }
}

// === Health ===

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres_time: Option<DateTime<Utc>>,
    pub redis: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            status: if report.is_ok() { "ok" } else { "error" },
            database: report.database.as_str(),
            postgres_time: report.database_time,
            redis: report.cache.as_str(),
            error: report.error,
        }
    }
}
