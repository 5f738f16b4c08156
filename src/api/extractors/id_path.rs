use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use crate::error::AppError;

/// Single numeric `{id}` path segment. A non-numeric id is a `BadRequest`
/// carried in the usual error body rather than axum's plain-text rejection.
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(IdPath(id))
    }
}
