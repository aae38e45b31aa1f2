use crate::api::ErrorResponse;
use crate::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

/// Handler-level error; every variant renders as `{error, field?}`.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Domain(shared::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<shared::Error> for ApiError {
    fn from(err: shared::Error) -> Self {
        ApiError::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(err) => {
                warn!("Rejected request: {}", err);
                let body = match err.field() {
                    Some(field) => ErrorResponse::for_field(err.to_string(), field),
                    None => ErrorResponse::new(err.to_string()),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::Domain(shared::Error::Validation { field, message }) => {
                warn!("Rejected request: {}", message);
                let body = match field {
                    Some(field) => ErrorResponse::for_field(message, field),
                    None => ErrorResponse::new(message),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::Domain(err @ shared::Error::NotFound(_)) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new(err.to_string()))
            }
            ApiError::Domain(shared::Error::StorageUnavailable(detail)) => {
                error!(error = %detail, "Database operation failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("database unavailable"),
                )
            }
            ApiError::Domain(err @ shared::Error::CacheUnavailable) => {
                warn!("Cache operation rejected: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new(err.to_string()),
                )
            }
            ApiError::Domain(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
