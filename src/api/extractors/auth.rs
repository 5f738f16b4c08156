use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::auth::Identity;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

/// Caller authenticated by an `Authorization: Bearer <token>` header.
pub struct AuthUser(pub Identity);

fn not_authenticated() -> AppError {
    AppError::Unauthorized("Not authenticated".into())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts.headers.get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(not_authenticated)?;

        let (scheme, token) = auth_header.split_once(' ').ok_or_else(not_authenticated)?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(not_authenticated());
        }

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let identity = app_state.auth_provider.validate(token).await?;

        Span::current().record("user", identity.username.as_str());

        Ok(AuthUser(identity))
    }
}
