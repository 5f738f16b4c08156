use std::sync::Arc;
use tracing::{info, warn};
use crate::domain::models::attendee::Attendee;
use crate::domain::ports::AttendeeRepository;
use crate::error::AppError;

/// One-way `not_checked_in -> checked_in` transition for a single attendee.
#[derive(Clone)]
pub struct CheckInService {
    attendees: Arc<dyn AttendeeRepository>,
}

impl CheckInService {
    pub fn new(attendees: Arc<dyn AttendeeRepository>) -> Self {
        Self { attendees }
    }

    pub async fn check_in(&self, attendee_id: i64) -> Result<Attendee, AppError> {
        if let Some(attendee) = self.attendees.check_in_if_pending(attendee_id).await? {
            info!(attendee_id, event_id = attendee.event_id, "Attendee checked in");
            return Ok(attendee);
        }

        match self.attendees.find_by_id(attendee_id).await? {
            Some(_) => {
                warn!(attendee_id, "Check-in rejected: already checked in");
                Err(AppError::AlreadyCheckedIn)
            }
            None => Err(AppError::NotFound("Attendee not found".into())),
        }
    }
}
