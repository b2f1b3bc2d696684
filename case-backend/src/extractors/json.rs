// src/extractors/json.rs

use crate::error::AppError;
use axum::extract::{rejection::JsonRejection, FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON ボディをデシリアライズし、`validator` で検証する Extractor
///
/// 形式エラー・未知のフィールドは 400 として返す
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected JSON body");
                AppError::BadRequest(rejection.body_text())
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
