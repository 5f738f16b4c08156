use crate::domain::{models::attendee::{Attendee, NewAttendee}, ports::AttendeeRepository};
use crate::error::{unique_as_conflict, AppError};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAttendeeRepo {
    pool: SqlitePool,
}

impl SqliteAttendeeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendeeRepository for SqliteAttendeeRepo {
    async fn insert_if_capacity(&self, attendee: &NewAttendee) -> Result<Attendee, AppError> {
        let event_exists: Option<i64> = sqlx::query_scalar("SELECT event_id FROM events WHERE event_id = ?")
            .bind(attendee.event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if event_exists.is_none() {
            return Err(AppError::NotFound("Event not found".into()));
        }

        // A write statement takes SQLite's write lock before it reads, so the
        // count below cannot go stale between the check and the insert.
        let inserted = sqlx::query_as::<_, Attendee>(
            r#"INSERT INTO attendees (first_name, last_name, email, phone_number, event_id, check_in_status, created_at)
               SELECT ?, ?, ?, ?, ?, FALSE, ?
               WHERE (SELECT COUNT(*) FROM attendees WHERE event_id = ?)
                   < (SELECT max_attendees FROM events WHERE event_id = ?)
               RETURNING *"#
        )
            .bind(&attendee.first_name)
            .bind(&attendee.last_name)
            .bind(&attendee.email)
            .bind(&attendee.phone_number)
            .bind(attendee.event_id)
            .bind(attendee.created_at)
            .bind(attendee.event_id)
            .bind(attendee.event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unique_as_conflict("Email already registered"))?;

        inserted.ok_or(AppError::CapacityExceeded)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE attendee_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE event_id = ? ORDER BY attendee_id ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn check_in_if_pending(&self, id: i64) -> Result<Option<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>(
            "UPDATE attendees SET check_in_status = TRUE WHERE attendee_id = ? AND check_in_status = FALSE RETURNING *",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn check_in_batch(&self, event_id: i64, ids: &[i64]) -> Result<Vec<bool>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut matched = Vec::with_capacity(ids.len());

        for id in ids {
            let result = sqlx::query("UPDATE attendees SET check_in_status = TRUE WHERE attendee_id = ? AND event_id = ?")
                .bind(id)
                .bind(event_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            matched.push(result.rows_affected() > 0);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(matched)
    }
}
