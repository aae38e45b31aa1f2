pub mod memory;
pub mod moka_cache;
pub mod postgres;
pub mod redis_cache;

pub use memory::MemoryTodoStore;
pub use moka_cache::{MokaCache, MokaConnector};
pub use postgres::PgTodoStore;
pub use redis_cache::{RedisCache, RedisConnector};
