pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types
pub use domain::{CacheEntry, CacheProbe, HealthReport, KeyTtl, Todo, TodoId};
pub use ports::{CacheBackend, CacheConnector, TodoStore};
pub use services::{CacheClient, ConnectionState, HealthReporter, TodoService};
