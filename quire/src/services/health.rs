use crate::domain::{BackendStatus, HealthReport};
use crate::ports::TodoStore;
use crate::services::cache::CacheClient;
use std::sync::Arc;
use tracing::{debug, error};

/// Aggregates liveness of the durable store and the cache into one report.
#[derive(Clone)]
pub struct HealthReporter {
    store: Arc<dyn TodoStore>,
    cache: Arc<CacheClient>,
}

impl HealthReporter {
    pub fn new(store: Arc<dyn TodoStore>, cache: Arc<CacheClient>) -> Self {
        Self { store, cache }
    }

    /// Never fails; a store failure is folded into the report.
    pub async fn check(&self) -> HealthReport {
        debug!("Checking database connection");

        debug!(
            cache = self.cache.name(),
            state = self.cache.state().as_str(),
            "Checking cache connection"
        );
        let cache = if self.cache.is_ready() {
            BackendStatus::Connected
        } else {
            BackendStatus::Disconnected
        };

        match self.store.now().await {
            Ok(time) => {
                debug!(%time, "Database OK");
                HealthReport {
                    database: BackendStatus::Connected,
                    database_time: Some(time),
                    cache,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Database health check failed");
                HealthReport {
                    database: BackendStatus::Disconnected,
                    database_time: None,
                    cache,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
