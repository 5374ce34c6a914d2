//! Application configuration storage (`config.toml`).

use std::path::PathBuf;

use stint_core::config::StintConfig;
use stint_core::Result;

use crate::paths::StintPaths;
use crate::storage::atomic_toml::AtomicTomlFile;

/// Storage for the main configuration file.
pub struct ConfigStorage {
    file: AtomicTomlFile<StintConfig>,
}

impl ConfigStorage {
    /// Creates a storage handle at the default location
    /// (`<config_dir>/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(StintPaths::config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Loads the configuration; a missing file yields defaults. A present
    /// but unparsable file is an error, so startup fails instead of
    /// silently dropping user settings.
    pub fn load_or_default(&self) -> Result<StintConfig> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    pub fn save(&self, config: &StintConfig) -> Result<()> {
        self.file.save(config)
    }
}
