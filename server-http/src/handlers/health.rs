use crate::api::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use tracing::info;

/// GET /health
///
/// Always 200; backend failures are reported in the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = state.health.check().await;
    info!(
        database = report.database.as_str(),
        redis = report.cache.as_str(),
        "Health check"
    );
    Json(report.into())
}
