use crate::domain::{models::attendee::{Attendee, NewAttendee}, ports::AttendeeRepository};
use crate::error::{unique_as_conflict, AppError};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAttendeeRepo {
    pool: PgPool,
}

impl PostgresAttendeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendeeRepository for PostgresAttendeeRepo {
    async fn insert_if_capacity(&self, attendee: &NewAttendee) -> Result<Attendee, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the event serializes registrations for it until commit.
        let max_attendees: i32 = sqlx::query_scalar("SELECT max_attendees FROM events WHERE event_id = $1 FOR UPDATE")
            .bind(attendee.event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

        let registered: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
            .bind(attendee.event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if registered >= i64::from(max_attendees) {
            return Err(AppError::CapacityExceeded);
        }

        let created = sqlx::query_as::<_, Attendee>(
            r#"INSERT INTO attendees (first_name, last_name, email, phone_number, event_id, check_in_status, created_at)
               VALUES ($1, $2, $3, $4, $5, FALSE, $6)
               RETURNING *"#
        )
            .bind(&attendee.first_name)
            .bind(&attendee.last_name)
            .bind(&attendee.email)
            .bind(&attendee.phone_number)
            .bind(attendee.event_id)
            .bind(attendee.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(unique_as_conflict("Email already registered"))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE attendee_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE event_id = $1 ORDER BY attendee_id ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn check_in_if_pending(&self, id: i64) -> Result<Option<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>(
            "UPDATE attendees SET check_in_status = TRUE WHERE attendee_id = $1 AND check_in_status = FALSE RETURNING *",
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
            let result = sqlx::query("UPDATE attendees SET check_in_status = TRUE WHERE attendee_id = $1 AND event_id = $2")
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
