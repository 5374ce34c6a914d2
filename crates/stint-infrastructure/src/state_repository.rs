//! Persistence for the session state (`state.toml`).
//!
//! The session is the one file that must survive crashes with a running
//! timer in it, so loads degrade rather than fail: a corrupt file is
//! reported back to the caller alongside a fresh session instead of
//! aborting startup.

use std::path::PathBuf;

use tracing::warn;

use stint_core::session::Session;
use stint_core::{Result, StintError};

use crate::paths::StintPaths;
use crate::storage::atomic_toml::AtomicTomlFile;

/// Repository for the single session state document.
pub struct SessionStateRepository {
    file: AtomicTomlFile<Session>,
}

impl SessionStateRepository {
    /// Creates a repository at the default location
    /// (`<config_dir>/state.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(StintPaths::state_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Loads the session. A missing file is a fresh session; an unreadable
    /// or unparsable file also yields a fresh session, with the original
    /// error returned so the caller can tell the user what was lost.
    pub fn load_or_recover(&self) -> (Session, Option<StintError>) {
        match self.file.load() {
            Ok(Some(session)) => (session, None),
            Ok(None) => (Session::default(), None),
            Err(e) => {
                warn!("session state unreadable, starting fresh: {}", e);
                (Session::default(), Some(e))
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        self.file.save(session).map_err(|e| {
            StintError::persistence(format!("failed to save session state: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_a_fresh_session() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SessionStateRepository::with_path(temp_dir.path().join("state.toml"));

        let (session, recovered) = repo.load_or_recover();
        assert_eq!(session, Session::default());
        assert!(recovered.is_none());
    }

    #[test]
    fn save_and_load_preserve_the_running_timer() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SessionStateRepository::with_path(temp_dir.path().join("state.toml"));

        let mut session = Session::default();
        session.start_at("SB-42", Utc::now()).unwrap();
        repo.save(&session).unwrap();

        let (loaded, recovered) = repo.load_or_recover();
        assert!(recovered.is_none());
        assert_eq!(loaded, session);
        assert!(loaded.is_running());
    }

    #[test]
    fn corrupt_file_degrades_to_a_fresh_session() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        std::fs::write(&path, "active_task_id = [broken").unwrap();

        let repo = SessionStateRepository::with_path(path);
        let (session, recovered) = repo.load_or_recover();
        assert_eq!(session, Session::default());
        assert!(recovered.is_some());
    }
}
