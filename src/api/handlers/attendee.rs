use axum::{extract::{State, Multipart}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, id_path::IdPath, validated_json::ValidatedJson};
use crate::api::dtos::{
    requests::CreateAttendeeRequest,
    responses::{BulkCheckInResponse, MessageResponse},
};
use crate::domain::models::attendee::NewAttendee;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

pub async fn register_attendee(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateAttendeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.status_clock.reconcile(Utc::now()).await;

    let attendee = NewAttendee::new(
        payload.first_name,
        payload.last_name,
        payload.email,
        payload.phone_number,
        payload.event_id,
    );

    let created = state.registration.register(attendee).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_attendees(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(event_id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    state.status_clock.reconcile(Utc::now()).await;

    let attendees = state.queries.list_attendees(event_id).await?;
    Ok(Json(attendees))
}

pub async fn checkin_attendee(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(attendee_id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    state.status_clock.reconcile(Utc::now()).await;

    state.check_in.check_in(attendee_id).await?;
    Ok(Json(MessageResponse { message: "Check-in successful".to_string() }))
}

pub async fn bulk_checkin(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(event_id): IdPath,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    state.status_clock.reconcile(Utc::now()).await;

    let upload = read_file_field(&mut multipart).await?;
    let report = state.bulk_check_in.process(event_id, &upload).await?;

    let checked_in_count = report.checked_in_count();
    info!("Bulk check-in for event {}: {} attendees checked in", event_id, checked_in_count);

    Ok(Json(BulkCheckInResponse {
        message: format!("{} attendees checked in", checked_in_count),
        checked_in_count,
        unmatched_rows: report.unmatched_count(),
        malformed_rows: report.malformed_count(),
    }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart.next_field().await
        .map_err(|e| AppError::BadRequest(e.body_text()))? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(AppError::Validation("Missing file upload (multipart field 'file')".into()))
}
