//! Note domain model and repository trait.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// What kind of note this is. Free-text input defaults to `Note`; the other
/// kinds exist for `/note add` with an explicit marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Note,
    Blocker,
    Decision,
    Idea,
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NoteKind::Note => "note",
            NoteKind::Blocker => "blocker",
            NoteKind::Decision => "decision",
            NoteKind::Idea => "idea",
        };
        write!(f, "{}", label)
    }
}

/// A stored note, optionally attached to a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub kind: NoteKind,
    pub content: String,
    /// Ticket the note was taken against, if a task was active.
    pub ticket_key: Option<String>,
}

/// Input for creating a note; the repository assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub kind: NoteKind,
    pub content: String,
    pub ticket_key: Option<String>,
}

impl NewNote {
    pub fn text(content: impl Into<String>, ticket_key: Option<String>) -> Self {
        Self {
            kind: NoteKind::Note,
            content: content.into(),
            ticket_key,
        }
    }
}

/// Local note store.
pub trait NoteRepository: Send + Sync {
    /// Persists a new note and returns it with id and timestamp assigned.
    fn add(&self, note: NewNote) -> Result<Note>;

    /// Most recent notes, newest first.
    fn list_recent(&self, limit: usize) -> Result<Vec<Note>>;

    /// Looks up a note by id. Errors with `NotFound` if absent.
    fn get(&self, id: u64) -> Result<Note>;

    /// Deletes a note by id. Errors with `NotFound` if absent.
    fn delete(&self, id: u64) -> Result<()>;

    /// All notes created on the given (UTC) day, oldest first.
    fn for_day(&self, day: NaiveDate) -> Result<Vec<Note>>;
}
