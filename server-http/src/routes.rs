use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use shared::config::HttpConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build and configure the application router
pub fn build_router(state: AppState, config: &HttpConfig) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Todo routes
        .route("/todos", get(handlers::list_todos))
        .route("/todos", post(handlers::create_todo))
        .route("/todos/{id}", put(handlers::update_todo))
        .route("/todos/{id}", delete(handlers::delete_todo))
        // Cache routes
        .route("/redis", post(handlers::set_value))
        .route("/redis/test", get(handlers::probe))
        .route("/redis/{key}", get(handlers::get_value))
        .route("/redis/{key}", delete(handlers::delete_value))
        .route("/redis/{key}/ttl", get(handlers::key_ttl))
        .route("/redis/{key}/expire", post(handlers::expire_key))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

/// `*` (or nothing configured) allows any origin
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
