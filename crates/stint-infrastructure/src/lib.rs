//! File-backed infrastructure for stint: paths, atomic TOML storage, and
//! the repositories behind the core domain traits.

pub mod note_repository;
pub mod paths;
pub mod state_repository;
pub mod storage;
pub mod time_entry_repository;

pub use note_repository::TomlNoteRepository;
pub use paths::StintPaths;
pub use state_repository::SessionStateRepository;
pub use storage::{AtomicTomlFile, ConfigStorage, SecretStorage};
pub use time_entry_repository::TomlTimeEntryRepository;
