use crate::domain::models::{
    event::{Event, EventFilter, NewEvent},
    attendee::{Attendee, NewAttendee},
    user::User,
    auth::{AccessToken, Credentials, Identity},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &NewEvent) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError>;
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Events whose `end_time` is before `now` and that are not yet completed.
    async fn find_elapsed(&self, now: DateTime<Utc>) -> Result<Vec<Event>, AppError>;
    /// Marks the given events completed in one transaction. Rows whose
    /// `end_time` is no longer before `now` are left untouched.
    async fn mark_completed(&self, ids: &[i64], now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// Inserts the attendee only while the event is below `max_attendees`.
    ///
    /// Fails with `NotFound` for an unknown event, `CapacityExceeded` when the
    /// event is full and `Conflict` on a duplicate email. The count and the
    /// insert are atomic with respect to other registrations for the event.
    async fn insert_if_capacity(&self, attendee: &NewAttendee) -> Result<Attendee, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Attendee>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Attendee>, AppError>;
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, AppError>;
    /// Flips `check_in_status` to true only if it is currently false.
    /// Returns `None` when no row changed.
    async fn check_in_if_pending(&self, id: i64) -> Result<Option<Attendee>, AppError>;
    /// Sets `check_in_status` for each id that belongs to `event_id`, in one
    /// transaction. The result is positional: `true` where a row matched.
    async fn check_in_batch(&self, event_id: i64, ids: &[i64]) -> Result<Vec<bool>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AppError>;
    fn issue_token(&self, identity: &Identity) -> Result<AccessToken, AppError>;
    async fn validate(&self, token: &str) -> Result<Identity, AppError>;
}
