use crate::domain::{models::event::{Event, EventFilter, NewEvent}, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &NewEvent) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                name, description, start_time, end_time, location, max_attendees, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *"#
        )
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(&event.location)
            .bind(event.max_attendees)
            .bind(event.status.as_str())
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE event_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM events WHERE 1 = 1");
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(location) = &filter.location {
            query.push(" AND location = ").push_bind(location.clone());
        }
        if let Some(starts_from) = filter.starts_from {
            query.push(" AND start_time >= ").push_bind(starts_from);
        }
        query.push(" ORDER BY event_id ASC");

        query.build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                name=$1, description=$2, start_time=$3, end_time=$4, location=$5, max_attendees=$6, status=$7
               WHERE event_id=$8 RETURNING *"#
        )
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(&event.location)
            .bind(event.max_attendees)
            .bind(event.status.as_str())
            .bind(event.event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    async fn find_elapsed(&self, now: DateTime<Utc>) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE end_time < $1 AND status != 'completed'",
        )
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_completed(&self, ids: &[i64], now: DateTime<Utc>) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let mut query = QueryBuilder::<Postgres>::new(
            "UPDATE events SET status = 'completed' WHERE status != 'completed' AND end_time < ",
        );
        query.push_bind(now);
        query.push(" AND event_id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = query.build().execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
