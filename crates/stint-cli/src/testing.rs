//! In-memory collaborators for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use stint_core::config::StintConfig;
use stint_core::note::{NewNote, Note, NoteRepository};
use stint_core::portal::{PortalEntry, TimePortal};
use stint_core::session::Session;
use stint_core::summarize::Summarizer;
use stint_core::ticket::{Ticket, TicketDetails, TicketFilter, TicketTracker};
use stint_core::time_entry::{TimeEntry, TimeEntryRepository};
use stint_core::{AppContext, Result, StintError};

#[derive(Default)]
pub struct MemoryNotes {
    pub notes: Mutex<Vec<Note>>,
}

impl NoteRepository for MemoryNotes {
    fn add(&self, note: NewNote) -> Result<Note> {
        let mut notes = self.notes.lock().unwrap();
        let stored = Note {
            id: notes.len() as u64 + 1,
            created_at: Utc::now(),
            kind: note.kind,
            content: note.content,
            ticket_key: note.ticket_key,
        };
        notes.push(stored.clone());
        Ok(stored)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<Note>> {
        Ok(self.notes.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }

    fn get(&self, id: u64) -> Result<Note> {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| StintError::not_found("note", id.to_string()))
    }

    fn delete(&self, id: u64) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(StintError::not_found("note", id.to_string()));
        }
        Ok(())
    }

    fn for_day(&self, day: NaiveDate) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.created_at.date_naive() == day)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryTimeEntries {
    pub entries: Mutex<Vec<TimeEntry>>,
}

impl TimeEntryRepository for MemoryTimeEntries {
    fn add(&self, entry: TimeEntry) -> Result<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<TimeEntry>> {
        Ok(self.entries.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }

    fn for_day(&self, day: NaiveDate) -> Result<Vec<TimeEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.started_at.date_naive() == day)
            .cloned()
            .collect())
    }

    fn total_seconds(&self) -> Result<i64> {
        Ok(self.entries.lock().unwrap().iter().map(|e| e.seconds).sum())
    }

    fn mark_submitted(&self, id: Uuid) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.submitted = true;
                Ok(())
            }
            None => Err(StintError::not_found("time entry", id.to_string())),
        }
    }
}

/// Tracker that serves canned tickets and records mutations.
#[derive(Default)]
pub struct FakeTracker {
    pub tickets: Mutex<Vec<Ticket>>,
    pub transitions: Mutex<Vec<(String, String)>>,
    pub comments: Mutex<Vec<(String, String)>>,
    pub created: Mutex<Vec<String>>,
}

pub fn ticket(key: &str, summary: &str, status: &str) -> Ticket {
    Ticket {
        key: key.to_string(),
        summary: summary.to_string(),
        status: status.to_string(),
        priority: "Medium".to_string(),
        assignee: Some("Dev".to_string()),
        updated: Some(Utc::now()),
    }
}

#[async_trait]
impl TicketTracker for FakeTracker {
    async fn list(&self, _filter: &TicketFilter) -> Result<Vec<Ticket>> {
        Ok(self.tickets.lock().unwrap().clone())
    }

    async fn details(&self, key: &str) -> Result<TicketDetails> {
        let ticket = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.key == key)
            .cloned()
            .ok_or_else(|| StintError::not_found("ticket", key))?;
        Ok(TicketDetails {
            ticket,
            description: "details".to_string(),
            reporter: Some("Sam".to_string()),
            created: Some(Utc::now()),
        })
    }

    async fn set_status(&self, key: &str, status: &str) -> Result<()> {
        self.transitions
            .lock()
            .unwrap()
            .push((key.to_string(), status.to_string()));
        Ok(())
    }

    async fn create(&self, summary: &str, _description: &str) -> Result<String> {
        self.created.lock().unwrap().push(summary.to_string());
        Ok("SB-100".to_string())
    }

    async fn create_subtask(
        &self,
        parent: &str,
        summary: &str,
        _description: &str,
    ) -> Result<String> {
        self.created
            .lock()
            .unwrap()
            .push(format!("{}/{}", parent, summary));
        Ok("SB-101".to_string())
    }

    async fn add_comment(&self, key: &str, body: &str) -> Result<()> {
        self.comments
            .lock()
            .unwrap()
            .push((key.to_string(), body.to_string()));
        Ok(())
    }
}

/// Portal that records what it was asked to submit.
#[derive(Default)]
pub struct RecordingPortal {
    pub submitted: Mutex<Vec<PortalEntry>>,
}

#[async_trait]
impl TimePortal for RecordingPortal {
    async fn submit_entry(&self, entry: &PortalEntry) -> Result<()> {
        self.submitted.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Summarizer that returns the prompt it was given, so tests can assert on
/// the prompt contents.
pub struct EchoSummarizer;

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

pub struct TestContext {
    pub notes: Arc<MemoryNotes>,
    pub time_entries: Arc<MemoryTimeEntries>,
    pub tracker: Arc<FakeTracker>,
    pub portal: Arc<RecordingPortal>,
}

impl TestContext {
    pub fn new() -> (Self, AppContext) {
        let notes = Arc::new(MemoryNotes::default());
        let time_entries = Arc::new(MemoryTimeEntries::default());
        let tracker = Arc::new(FakeTracker::default());
        let portal = Arc::new(RecordingPortal::default());
        let ctx = AppContext::new(
            Session::new(),
            StintConfig::default(),
            tracker.clone(),
            portal.clone(),
            Arc::new(EchoSummarizer),
            notes.clone(),
            time_entries.clone(),
        );
        let handles = Self {
            notes,
            time_entries,
            tracker,
            portal,
        };
        (handles, ctx)
    }

    pub fn tickets_push(&self, ticket: Ticket) {
        self.tracker.tickets.lock().unwrap().push(ticket);
    }
}

/// Time entry store whose writes always fail, for storage-failure paths.
pub struct FailingTimeEntries;

impl TimeEntryRepository for FailingTimeEntries {
    fn add(&self, _entry: TimeEntry) -> Result<()> {
        Err(StintError::persistence("disk full"))
    }

    fn list_recent(&self, _limit: usize) -> Result<Vec<TimeEntry>> {
        Ok(Vec::new())
    }

    fn for_day(&self, _day: NaiveDate) -> Result<Vec<TimeEntry>> {
        Ok(Vec::new())
    }

    fn total_seconds(&self) -> Result<i64> {
        Ok(0)
    }

    fn mark_submitted(&self, _id: Uuid) -> Result<()> {
        Err(StintError::persistence("disk full"))
    }
}

/// Context wired with [`FailingTimeEntries`]; everything else in memory.
pub fn failing_time_entries_context() -> AppContext {
    AppContext::new(
        Session::new(),
        StintConfig::default(),
        Arc::new(FakeTracker::default()),
        Arc::new(RecordingPortal::default()),
        Arc::new(EchoSummarizer),
        Arc::new(MemoryNotes::default()),
        Arc::new(FailingTimeEntries),
    )
}
