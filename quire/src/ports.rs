#![deny(clippy::all)]

use crate::domain::{KeyTtl, NewTodo, Todo, TodoChanges, TodoId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{Result, TtlSecs};
use std::sync::Arc;

// Ports are the pluggable extension points for the durable store and the cache backend

/// Port for the durable todo table
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// All rows, newest first
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn create(&self, todo: NewTodo) -> Result<Todo>;
    /// `None` when no row has this id
    async fn update(&self, id: TodoId, changes: TodoChanges) -> Result<Option<Todo>>;
    /// Succeeds whether or not a row matched
    async fn delete(&self, id: TodoId) -> Result<()>;
    /// Lightweight liveness query returning the store's clock
    async fn now(&self) -> Result<DateTime<Utc>>;
}

/// Port for an established cache connection (e.g., Redis)
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    async fn ping(&self) -> Result<String>;
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// Writes the value; a TTL is attached in the same step when given
    async fn set(&self, key: &str, value: &str, ttl: Option<TtlSecs>) -> Result<()>;
    /// Returns whether the key existed
    async fn expire(&self, key: &str, ttl: TtlSecs) -> Result<bool>;
    /// Returns whether the key existed
    async fn delete(&self, key: &str) -> Result<bool>;
    async fn ttl(&self, key: &str) -> Result<KeyTtl>;
}

/// Port for establishing cache connections
#[async_trait]
pub trait CacheConnector: Send + Sync + 'static {
    /// One connection attempt
    async fn connect(&self) -> Result<Arc<dyn CacheBackend>>;
}
