//! TOML-backed note store (`notes.toml`).

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stint_core::note::{NewNote, Note, NoteRepository};
use stint_core::{Result, StintError};

use crate::paths::StintPaths;
use crate::storage::atomic_toml::AtomicTomlFile;

/// On-disk document: a monotonically increasing id counter plus the notes
/// themselves, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NotesDocument {
    next_id: u64,
    #[serde(default)]
    notes: Vec<Note>,
}

impl Default for NotesDocument {
    fn default() -> Self {
        Self {
            next_id: 1,
            notes: Vec::new(),
        }
    }
}

/// Note repository persisted as a single TOML document.
pub struct TomlNoteRepository {
    file: AtomicTomlFile<NotesDocument>,
}

impl TomlNoteRepository {
    /// Creates a repository at the default location
    /// (`<config_dir>/notes.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(StintPaths::notes_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    fn load_document(&self) -> Result<NotesDocument> {
        Ok(self.file.load()?.unwrap_or_default())
    }
}

impl NoteRepository for TomlNoteRepository {
    fn add(&self, note: NewNote) -> Result<Note> {
        let mut created = None;
        self.file.update(NotesDocument::default(), |doc| {
            let stored = Note {
                id: doc.next_id,
                created_at: Utc::now(),
                kind: note.kind,
                content: note.content.clone(),
                ticket_key: note.ticket_key.clone(),
            };
            doc.next_id += 1;
            doc.notes.push(stored.clone());
            created = Some(stored);
            Ok(())
        })?;
        created.ok_or_else(|| StintError::internal("note was not recorded"))
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<Note>> {
        let doc = self.load_document()?;
        Ok(doc.notes.into_iter().rev().take(limit).collect())
    }

    fn get(&self, id: u64) -> Result<Note> {
        let doc = self.load_document()?;
        doc.notes
            .into_iter()
            .find(|note| note.id == id)
            .ok_or_else(|| StintError::not_found("note", id.to_string()))
    }

    fn delete(&self, id: u64) -> Result<()> {
        let mut found = false;
        self.file.update(NotesDocument::default(), |doc| {
            let before = doc.notes.len();
            doc.notes.retain(|note| note.id != id);
            found = doc.notes.len() < before;
            Ok(())
        })?;
        if found {
            Ok(())
        } else {
            Err(StintError::not_found("note", id.to_string()))
        }
    }

    fn for_day(&self, day: NaiveDate) -> Result<Vec<Note>> {
        let doc = self.load_document()?;
        Ok(doc
            .notes
            .into_iter()
            .filter(|note| note.created_at.date_naive() == day)
            .collect())
    }
}
