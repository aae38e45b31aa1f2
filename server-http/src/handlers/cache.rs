use crate::api::{
    ExpireRequest, GetValueResponse, KeyTtlResponse, ProbeResponse, SetValueRequest,
    SuccessResponse,
};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{
    extract::{Path, State},
    Json,
};
use shared::TtlSecs;
use tracing::info;

/// GET /redis/test
///
/// Never fails; an unready cache reports `disconnected`.
pub async fn probe(State(state): State<AppState>) -> Json<ProbeResponse> {
    Json(state.cache.probe().await.into())
}

/// GET /redis/{key}
pub async fn get_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetValueResponse>, ApiError> {
    info!("GET: key={}", key);

    let value = state.cache.get(&key).await?;
    Ok(Json(GetValueResponse { key, value }))
}

/// POST /redis
pub async fn set_value(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SetValueRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let entry = RequestValidator::cache_entry(req)?;
    info!("SET: key={}, ttl={:?}", entry.key, entry.ttl.map(TtlSecs::secs));

    state.cache.set(&entry).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /redis/{key}
pub async fn delete_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    info!("DELETE: key={}", key);

    state.cache.delete(&key).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /redis/{key}/ttl
pub async fn key_ttl(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyTtlResponse>, ApiError> {
    info!("TTL: key={}", key);

    let ttl = state.cache.ttl(&key).await?;
    Ok(Json(KeyTtlResponse::new(key, ttl)))
}

/// POST /redis/{key}/expire
pub async fn expire_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ApiJson(req): ApiJson<ExpireRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let ttl = RequestValidator::expiry(req)?;
    info!("EXPIRE: key={}, ttl={}", key, ttl.secs());

    let existed = state.cache.expire(&key, ttl).await?;
    Ok(Json(SuccessResponse { success: existed }))
}
