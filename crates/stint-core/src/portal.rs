//! Accounting portal collaborator interface.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;

/// A time entry to submit to the accounting portal.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalEntry {
    pub date: NaiveDate,
    pub hours: f64,
    pub description: String,
}

/// The external accounting portal, reached through browser automation the
/// core does not reimplement.
#[async_trait]
pub trait TimePortal: Send + Sync {
    /// Submits one time entry. Failure is a recoverable `Collaborator`
    /// error; nothing is retried here.
    async fn submit_entry(&self, entry: &PortalEntry) -> Result<()>;
}
