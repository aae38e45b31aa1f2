pub mod cache;
pub mod health;
pub mod todos;

pub use cache::*;
pub use health::*;
pub use todos::*;
