use crate::error::ApiError;
use crate::validation::ValidationError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// `Json` whose rejections are reported as 400 `{error}` bodies
/// instead of axum's plain-text 415/422 responses.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(malformed(rejection).into()),
        }
    }
}

fn malformed(rejection: JsonRejection) -> ValidationError {
    ValidationError::MalformedBody(rejection.body_text())
}
