use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Event is full")]
    CapacityExceeded,
    #[error("Attendee already checked in")]
    AlreadyCheckedIn,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(e) if is_unique_violation(e) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::CapacityExceeded => "capacity_exceeded",
            AppError::AlreadyCheckedIn => "already_checked_in",
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized(_) => "unauthorized",
            _ => "internal_error",
        }
    }
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error().is_some_and(|db_err| db_err.is_unique_violation())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::Database(e) => {
                if is_unique_violation(e) {
                    (StatusCode::CONFLICT, "Resource already exists (duplicate entry)".to_string())
                } else {
                    error!("Database error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                }
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::CapacityExceeded => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::AlreadyCheckedIn => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Unauthorized(msg) => {
                let body = Json(json!({ "error": msg, "code": code }));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    body,
                ).into_response();
            }
            AppError::Internal | AppError::Config(_) | AppError::Migration(_) => {
                error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

/// Maps a unique-constraint violation to `Conflict(message)`; any other
/// store error stays a `Database` error.
pub fn unique_as_conflict(message: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        if is_unique_violation(&e) {
            AppError::Conflict(message.to_string())
        } else {
            AppError::Database(e)
        }
    }
}
