//! TOML-backed time entry store (`time_entries.toml`).

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stint_core::time_entry::{TimeEntry, TimeEntryRepository};
use stint_core::{Result, StintError};

use crate::paths::StintPaths;
use crate::storage::atomic_toml::AtomicTomlFile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TimeEntriesDocument {
    #[serde(default)]
    entries: Vec<TimeEntry>,
}

/// Time entry repository persisted as a single TOML document.
pub struct TomlTimeEntryRepository {
    file: AtomicTomlFile<TimeEntriesDocument>,
}

impl TomlTimeEntryRepository {
    /// Creates a repository at the default location
    /// (`<config_dir>/time_entries.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(StintPaths::time_entries_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    fn load_document(&self) -> Result<TimeEntriesDocument> {
        Ok(self.file.load()?.unwrap_or_default())
    }
}

impl TimeEntryRepository for TomlTimeEntryRepository {
    fn add(&self, entry: TimeEntry) -> Result<()> {
        self.file.update(TimeEntriesDocument::default(), |doc| {
            doc.entries.push(entry.clone());
            Ok(())
        })
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<TimeEntry>> {
        let doc = self.load_document()?;
        Ok(doc.entries.into_iter().rev().take(limit).collect())
    }

    fn for_day(&self, day: NaiveDate) -> Result<Vec<TimeEntry>> {
        let doc = self.load_document()?;
        Ok(doc
            .entries
            .into_iter()
            .filter(|entry| entry.started_at.date_naive() == day)
            .collect())
    }

    fn total_seconds(&self) -> Result<i64> {
        let doc = self.load_document()?;
        Ok(doc.entries.iter().map(|entry| entry.seconds).sum())
    }

    fn mark_submitted(&self, id: Uuid) -> Result<()> {
        let mut found = false;
        self.file.update(TimeEntriesDocument::default(), |doc| {
            if let Some(entry) = doc.entries.iter_mut().find(|entry| entry.id == id) {
                entry.submitted = true;
                found = true;
            }
            Ok(())
        })?;
        if found {
            Ok(())
        } else {
            Err(StintError::not_found("time entry", id.to_string()))
        }
    }
}
