use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use crate::domain::models::event::{Event, EventStatus};
use crate::domain::ports::EventRepository;
use crate::error::AppError;

/// Status an event should move to at `now`, or `None` if it is current.
pub fn reconciled_status(event: &Event, now: DateTime<Utc>) -> Option<EventStatus> {
    if event.end_time < now && event.status != EventStatus::Completed {
        Some(EventStatus::Completed)
    } else {
        None
    }
}

/// Derives `completed` from elapsed end times. Runs inline at the start of
/// every request that reads or writes events or attendees.
#[derive(Clone)]
pub struct StatusClock {
    events: Arc<dyn EventRepository>,
}

impl StatusClock {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    /// Best effort: a store failure is logged and reported as zero updates.
    pub async fn reconcile(&self, now: DateTime<Utc>) -> u64 {
        match self.try_reconcile(now).await {
            Ok(updated) => {
                if updated > 0 {
                    info!(updated, "Reconciled elapsed event statuses");
                }
                updated
            }
            Err(e) => {
                warn!("Status reconciliation skipped: {}", e);
                0
            }
        }
    }

    async fn try_reconcile(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let stale: Vec<i64> = self.events.find_elapsed(now).await?
            .iter()
            .filter(|event| reconciled_status(event, now).is_some())
            .map(|event| event.event_id)
            .collect();

        if stale.is_empty() {
            return Ok(0);
        }

        self.events.mark_completed(&stale, now).await
    }
}
