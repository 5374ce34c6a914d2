//! Credential file storage (`secret.json`).
//!
//! Plaintext JSON, guarded by file permissions: writes set 0600 on Unix.
//! Validation of the credentials themselves happens where they are used.

use std::fs;
use std::path::PathBuf;

use stint_core::config::SecretConfig;
use stint_core::{Result, StintError};

use crate::paths::StintPaths;

/// Storage for the secret configuration file.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a storage handle at the default location
    /// (`<config_dir>/secret.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: StintPaths::secret_file()?,
        })
    }

    /// Creates a storage handle at an explicit path (tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the secrets; a missing file yields empty defaults so that the
    /// setup flow can fill them in.
    pub fn load(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let config: SecretConfig = serde_json::from_str(&content).map_err(|e| {
            StintError::config(format!(
                "invalid secret file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Writes the secrets as pretty JSON and restricts permissions to the
    /// owner on Unix.
    pub fn save(&self, config: &SecretConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions)?;
        }

        Ok(())
    }
}
