//! JSON body extractor that rejects with `AppError`.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;

/// Like `axum::Json`, but rejections become `AppError`: bodies over the configured limit are
/// `PayloadTooLarge`, everything else is `BadRequest`. Rejection detail is logged, not returned.
#[derive(Clone, Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), rejection = %rejection.body_text(), "body rejected");
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    Err(AppError::PayloadTooLarge("request body too large".into()))
                } else {
                    Err(AppError::BadRequest("malformed request body".into()))
                }
            }
        }
    }
}
