use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Canceled,
}

#[derive(Debug, Error)]
#[error("Invalid event status: {0}")]
pub struct InvalidStatus(pub String);

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(EventStatus::Scheduled),
            "ongoing" => Ok(EventStatus::Ongoing),
            "completed" => Ok(EventStatus::Completed),
            "canceled" => Ok(EventStatus::Canceled),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for EventStatus {
    type Error = InvalidStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub event_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

/// Fields of an event before the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

/// Exact-match filters for event listing. `starts_from` is inclusive.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub location: Option<String>,
    pub starts_from: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [EventStatus::Scheduled, EventStatus::Ongoing, EventStatus::Completed, EventStatus::Canceled] {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_and_wrong_case() {
        assert!("finished".parse::<EventStatus>().is_err());
        assert!("Scheduled".parse::<EventStatus>().is_err());
        assert!("".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&EventStatus::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");
    }
}
