use std::sync::Arc;
use tracing::{debug, info};
use crate::domain::ports::{AttendeeRepository, EventRepository};
use crate::error::AppError;

/// One data line of an uploaded roster, after header removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterRow {
    Id { line: usize, attendee_id: i64 },
    Malformed { line: usize, reason: MalformedReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    MissingField,
    NotAnInteger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Matched,
    Unmatched,
    Malformed,
}

#[derive(Debug, Clone, Default)]
pub struct BulkCheckInReport {
    pub rows: Vec<RowOutcome>,
}

impl BulkCheckInReport {
    fn count(&self, outcome: RowOutcome) -> usize {
        self.rows.iter().filter(|r| **r == outcome).count()
    }

    pub fn checked_in_count(&self) -> usize {
        self.count(RowOutcome::Matched)
    }

    pub fn unmatched_count(&self) -> usize {
        self.count(RowOutcome::Unmatched)
    }

    pub fn malformed_count(&self) -> usize {
        self.count(RowOutcome::Malformed)
    }
}

/// Splits an uploaded roster into rows. The first line is always treated as
/// a header; only the first comma-separated field of each later line is read.
pub fn parse_roster(contents: &str) -> Vec<RosterRow> {
    contents
        .lines()
        .enumerate()
        .skip(1)
        .map(|(idx, raw)| parse_row(idx + 1, raw))
        .collect()
}

fn parse_row(line: usize, raw: &str) -> RosterRow {
    let field = first_field(raw);
    if field.is_empty() {
        return RosterRow::Malformed { line, reason: MalformedReason::MissingField };
    }
    match field.parse::<i64>() {
        Ok(attendee_id) => RosterRow::Id { line, attendee_id },
        Err(_) => RosterRow::Malformed { line, reason: MalformedReason::NotAnInteger },
    }
}

fn first_field(raw: &str) -> &str {
    let field = raw.split(',').next().unwrap_or_default().trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(field)
}

/// Applies a roster to one event. Per-row problems never abort the batch;
/// an unknown event is the only failure.
#[derive(Clone)]
pub struct BulkCheckInProcessor {
    events: Arc<dyn EventRepository>,
    attendees: Arc<dyn AttendeeRepository>,
}

impl BulkCheckInProcessor {
    pub fn new(events: Arc<dyn EventRepository>, attendees: Arc<dyn AttendeeRepository>) -> Self {
        Self { events, attendees }
    }

    pub async fn process(&self, event_id: i64, upload: &[u8]) -> Result<BulkCheckInReport, AppError> {
        self.events.find_by_id(event_id).await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

        let contents = std::str::from_utf8(upload)
            .map_err(|_| AppError::BadRequest("Uploaded file must be UTF-8 text".into()))?;

        let rows = parse_roster(contents);
        let ids: Vec<i64> = rows.iter()
            .filter_map(|row| match row {
                RosterRow::Id { attendee_id, .. } => Some(*attendee_id),
                RosterRow::Malformed { .. } => None,
            })
            .collect();

        let mut matches = if ids.is_empty() {
            Vec::new().into_iter()
        } else {
            self.attendees.check_in_batch(event_id, &ids).await?.into_iter()
        };

        let mut report = BulkCheckInReport::default();
        for row in &rows {
            let outcome = match row {
                RosterRow::Id { .. } => match matches.next() {
                    Some(true) => RowOutcome::Matched,
                    _ => RowOutcome::Unmatched,
                },
                RosterRow::Malformed { line, reason } => {
                    debug!(line, ?reason, "Skipping malformed roster row");
                    RowOutcome::Malformed
                }
            };
            report.rows.push(outcome);
        }

        info!(
            event_id,
            checked_in = report.checked_in_count(),
            unmatched = report.unmatched_count(),
            malformed = report.malformed_count(),
            "Bulk check-in finished"
        );
        Ok(report)
    }
}
