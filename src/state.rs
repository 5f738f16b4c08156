use std::sync::Arc;
use crate::domain::ports::{AttendeeRepository, AuthProvider, EventRepository};
use crate::domain::services::{
    bulk_checkin::BulkCheckInProcessor, check_in::CheckInService, event_query::EventQuery,
    registration::RegistrationGuard, status_clock::StatusClock,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub auth_provider: Arc<dyn AuthProvider>,
    pub status_clock: StatusClock,
    pub registration: RegistrationGuard,
    pub check_in: CheckInService,
    pub bulk_check_in: BulkCheckInProcessor,
    pub queries: EventQuery,
}

impl AppState {
    pub fn new(
        config: Config,
        event_repo: Arc<dyn EventRepository>,
        attendee_repo: Arc<dyn AttendeeRepository>,
        auth_provider: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            status_clock: StatusClock::new(event_repo.clone()),
            registration: RegistrationGuard::new(event_repo.clone(), attendee_repo.clone()),
            check_in: CheckInService::new(attendee_repo.clone()),
            bulk_check_in: BulkCheckInProcessor::new(event_repo.clone(), attendee_repo.clone()),
            queries: EventQuery::new(event_repo.clone(), attendee_repo),
            event_repo,
            auth_provider,
        }
    }
}
