//! Ticket tracker collaborator interface.
//!
//! The tracker (Jira in practice) is an opaque external service; this module
//! only defines the narrow surface the command handlers call.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A ticket as returned by the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: String,
    pub assignee: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

/// Full ticket details for `/tasks <KEY>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDetails {
    pub ticket: Ticket,
    pub description: String,
    pub reporter: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// Which assigned tickets to list.
#[derive(Debug, Clone, PartialEq)]
pub enum TicketFilter {
    /// Tickets in "To Do" status.
    Todo,
    /// All open tickets (not done/resolved).
    Active,
    /// Tickets completed within the last `days` days.
    Completed { days: u32 },
    /// Tickets worked on on a specific day.
    WorkedOn { date: NaiveDate },
}

/// External ticket tracking service.
#[async_trait]
pub trait TicketTracker: Send + Sync {
    /// Lists the current user's tickets matching `filter`.
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>>;

    /// Full details for one ticket.
    async fn details(&self, key: &str) -> Result<TicketDetails>;

    /// Transitions a ticket to the named status.
    async fn set_status(&self, key: &str, status: &str) -> Result<()>;

    /// Creates a ticket, returning the new key.
    async fn create(&self, summary: &str, description: &str) -> Result<String>;

    /// Creates a subtask under `parent`, returning the new key.
    async fn create_subtask(&self, parent: &str, summary: &str, description: &str)
        -> Result<String>;

    /// Adds a comment to a ticket.
    async fn add_comment(&self, key: &str, body: &str) -> Result<()>;
}
