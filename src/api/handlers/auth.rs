use axum::{extract::{rejection::FormRejection, State}, response::IntoResponse, Form, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::domain::models::auth::Credentials;
use std::sync::Arc;
use tracing::info;

/// OAuth2 password flow: form-encoded `username` and `password`.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    form: Result<Form<Credentials>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(credentials) = form.map_err(|e| AppError::Validation(e.body_text()))?;

    let identity = state.auth_provider.authenticate(&credentials).await?;
    let token = state.auth_provider.issue_token(&identity)?;

    info!("User logged in: {}", identity.username);

    Ok(Json(token))
}
