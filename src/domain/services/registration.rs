use std::sync::Arc;
use tracing::{info, warn};
use crate::domain::models::attendee::{Attendee, NewAttendee};
use crate::domain::ports::{AttendeeRepository, EventRepository};
use crate::error::AppError;

/// Enforces the per-event capacity and the global email uniqueness on
/// registration.
#[derive(Clone)]
pub struct RegistrationGuard {
    events: Arc<dyn EventRepository>,
    attendees: Arc<dyn AttendeeRepository>,
}

impl RegistrationGuard {
    pub fn new(events: Arc<dyn EventRepository>, attendees: Arc<dyn AttendeeRepository>) -> Self {
        Self { events, attendees }
    }

    pub async fn register(&self, attendee: NewAttendee) -> Result<Attendee, AppError> {
        let event = self.events.find_by_id(attendee.event_id).await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

        // Checked ahead of capacity so a duplicate is reported as such even on
        // a full event. The UNIQUE index still catches concurrent duplicates.
        if self.attendees.find_by_email(&attendee.email).await?.is_some() {
            warn!("Registration rejected: email already registered");
            return Err(AppError::Conflict("Email already registered".into()));
        }

        match self.attendees.insert_if_capacity(&attendee).await {
            Ok(created) => {
                info!(event_id = event.event_id, attendee_id = created.attendee_id, "Attendee registered");
                Ok(created)
            }
            Err(AppError::CapacityExceeded) => {
                warn!(event_id = event.event_id, max_attendees = event.max_attendees, "Registration rejected: event is full");
                Err(AppError::CapacityExceeded)
            }
            Err(e) => Err(e),
        }
    }
}
