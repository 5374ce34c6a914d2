//! Time entry domain model and repository trait.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::session::ClosedSpan;

/// A closed timer span recorded against a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub ticket_key: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub seconds: i64,
    /// Whether this entry has been submitted to the accounting portal.
    #[serde(default)]
    pub submitted: bool,
}

impl TimeEntry {
    /// Builds an entry from a span closed by the session store.
    pub fn from_span(span: &ClosedSpan) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_key: span.task_id.clone(),
            started_at: span.started_at,
            ended_at: span.ended_at,
            seconds: span.seconds,
            submitted: false,
        }
    }
}

/// Local time entry store.
pub trait TimeEntryRepository: Send + Sync {
    fn add(&self, entry: TimeEntry) -> Result<()>;

    /// Most recent entries, newest first.
    fn list_recent(&self, limit: usize) -> Result<Vec<TimeEntry>>;

    /// Entries whose span started on the given (UTC) day, oldest first.
    fn for_day(&self, day: NaiveDate) -> Result<Vec<TimeEntry>>;

    /// Sum of all recorded seconds.
    fn total_seconds(&self) -> Result<i64>;

    /// Marks an entry as submitted to the portal. Errors with `NotFound`
    /// if absent.
    fn mark_submitted(&self, id: Uuid) -> Result<()>;
}

/// Formats a second count the way the trackers show it ("2h 30m", "45m").
pub fn format_seconds(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    match (hours, minutes) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_seconds_matches_tracker_style() {
        assert_eq!(format_seconds(0), "0m");
        assert_eq!(format_seconds(59), "0m");
        assert_eq!(format_seconds(60), "1m");
        assert_eq!(format_seconds(3600), "1h");
        assert_eq!(format_seconds(9000), "2h 30m");
        assert_eq!(format_seconds(-5), "0m");
    }

    #[test]
    fn entry_from_span_is_unsubmitted() {
        let span = ClosedSpan {
            task_id: "SB-1".to_string(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            seconds: 120,
        };
        let entry = TimeEntry::from_span(&span);
        assert_eq!(entry.ticket_key, "SB-1");
        assert_eq!(entry.seconds, 120);
        assert!(!entry.submitted);
    }
}
