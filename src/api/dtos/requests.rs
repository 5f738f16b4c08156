use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// Accepts RFC 3339 timestamps and offset-less `YYYY-MM-DDTHH:MM:SS[.f]`
/// values, which are read as UTC.
mod utc_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok().map(|dt| dt.and_utc()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid datetime: {}", raw)))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid datetime: {}", raw))),
                None => Ok(None),
            }
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "utc_datetime::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "utc_datetime::deserialize")]
    pub end_time: DateTime<Utc>,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    #[validate(range(min = 1, message = "max_attendees must be a positive integer"))]
    pub max_attendees: i32,
    pub status: Option<String>,
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "utc_datetime::option::deserialize")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "utc_datetime::option::deserialize")]
    pub end_time: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "max_attendees must be a positive integer"))]
    pub max_attendees: Option<i32>,
    pub status: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct CreateAttendeeRequest {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone_number must not be empty"))]
    pub phone_number: String,
    pub event_id: i64,
}
