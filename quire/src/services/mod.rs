pub mod cache;
pub mod health;
pub mod todos;

pub use cache::{CacheClient, ConnectionState};
pub use health::HealthReporter;
pub use todos::TodoService;
