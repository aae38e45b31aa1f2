use quire::{CacheClient, HealthReporter, TodoService, TodoStore};
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
    pub cache: Arc<CacheClient>,
    pub health: HealthReporter,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, cache: Arc<CacheClient>) -> Self {
        Self {
            todos: TodoService::new(store.clone()),
            health: HealthReporter::new(store, cache.clone()),
            cache,
        }
    }
}
