use std::sync::Arc;
use serde::Deserialize;
use chrono::{NaiveDate, Utc, DateTime};
use crate::domain::models::{attendee::Attendee, event::{Event, EventFilter, EventStatus}};
use crate::domain::ports::{AttendeeRepository, EventRepository};
use crate::error::AppError;

/// Raw listing filters as they arrive on the query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsParams {
    pub status: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
}

/// Start of the given `YYYY-MM-DD` day in UTC.
pub fn parse_date_filter(date: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::BadRequest("Invalid date format. Use YYYY-MM-DD.".into()))
}

impl ListEventsParams {
    pub fn into_filter(self) -> Result<EventFilter, AppError> {
        let status = self.status
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<EventStatus>())
            .transpose()
            .map_err(|_| AppError::BadRequest("Invalid event status".into()))?;

        let starts_from = self.date
            .filter(|d| !d.is_empty())
            .map(|d| parse_date_filter(&d))
            .transpose()?;

        Ok(EventFilter {
            status,
            location: self.location.filter(|l| !l.is_empty()),
            starts_from,
        })
    }
}

/// Read paths over events and their attendees. Callers reconcile statuses
/// before querying.
#[derive(Clone)]
pub struct EventQuery {
    events: Arc<dyn EventRepository>,
    attendees: Arc<dyn AttendeeRepository>,
}

impl EventQuery {
    pub fn new(events: Arc<dyn EventRepository>, attendees: Arc<dyn AttendeeRepository>) -> Self {
        Self { events, attendees }
    }

    // No pagination: every matching row is returned.
    pub async fn list_events(&self, params: ListEventsParams) -> Result<Vec<Event>, AppError> {
        let filter = params.into_filter()?;
        self.events.list(&filter).await
    }

    pub async fn get_event(&self, event_id: i64) -> Result<Event, AppError> {
        self.events.find_by_id(event_id).await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    pub async fn list_attendees(&self, event_id: i64) -> Result<Vec<Attendee>, AppError> {
        self.attendees.list_by_event(event_id).await
    }
}
