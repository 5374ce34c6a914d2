//! Unified path management for stint's on-disk files.
//!
//! Everything lives under the platform config directory (e.g.
//! `~/.config/stint/` on Linux):
//!
//! ```text
//! ~/.config/stint/
//! ├── config.toml          # Application configuration
//! ├── secret.json          # Credentials (0600)
//! ├── state.toml           # Session (active task + timer)
//! ├── notes.toml           # Note store
//! ├── time_entries.toml    # Time entry store
//! ├── history              # Readline history
//! └── logs/                # Application logs
//! ```

use std::path::PathBuf;

use stint_core::{Result, StintError};

/// Unified path management for stint.
pub struct StintPaths;

impl StintPaths {
    /// Returns the stint configuration directory, creating nothing.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("stint"))
            .ok_or_else(|| StintError::config("cannot determine the user config directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Credentials file. Keep permissions at 0600; `SecretStorage` sets
    /// them when writing.
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    pub fn state_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("state.toml"))
    }

    pub fn notes_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("notes.toml"))
    }

    pub fn time_entries_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("time_entries.toml"))
    }

    pub fn history_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("history"))
    }

    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
