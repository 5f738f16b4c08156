use axum::{extract::{State, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, id_path::IdPath, validated_json::ValidatedJson};
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::domain::models::event::{EventStatus, NewEvent};
use crate::domain::services::event_query::ListEventsParams;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::info;

fn parse_status(raw: &str) -> Result<EventStatus, AppError> {
    raw.parse().map_err(|_| AppError::BadRequest("Invalid event status".into()))
}

fn check_window(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<(), AppError> {
    if end_time <= start_time {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.status_clock.reconcile(Utc::now()).await;

    let status = payload.status.as_deref().map(parse_status).transpose()?.unwrap_or_default();
    check_window(payload.start_time, payload.end_time)?;

    let event = NewEvent {
        name: payload.name,
        description: payload.description,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        max_attendees: payload.max_attendees,
        status,
        created_at: Utc::now(),
    };

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} by {}", created.event_id, user.username);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(event_id): IdPath,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.status_clock.reconcile(Utc::now()).await;

    let mut event = state.event_repo.find_by_id(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if let Some(val) = payload.name { event.name = val; }
    if let Some(val) = payload.description { event.description = val; }
    if let Some(val) = payload.start_time { event.start_time = val; }
    if let Some(val) = payload.end_time { event.end_time = val; }
    if let Some(val) = payload.location { event.location = val; }
    if let Some(val) = payload.max_attendees { event.max_attendees = val; }
    if let Some(val) = payload.status { event.status = parse_status(&val)?; }

    check_window(event.start_time, event.end_time)?;

    let updated = state.event_repo.update(&event).await?;
    info!("Event updated: {}", event_id);
    Ok(Json(updated))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Query<ListEventsParams>,
) -> Result<impl IntoResponse, AppError> {
    state.status_clock.reconcile(Utc::now()).await;

    let events = state.queries.list_events(params).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    IdPath(event_id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    state.status_clock.reconcile(Utc::now()).await;

    let event = state.queries.get_event(event_id).await?;
    Ok(Json(event))
}
