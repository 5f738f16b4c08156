use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Attendee {
    pub attendee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub event_id: i64,
    pub check_in_status: bool,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttendee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub event_id: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAttendee {
    pub fn new(first_name: String, last_name: String, email: String, phone_number: String, event_id: i64) -> Self {
        Self {
            first_name,
            last_name,
            email,
            phone_number,
            event_id,
            created_at: Utc::now(),
        }
    }
}
