//! File-backed storage primitives.

pub mod atomic_toml;
pub mod config_storage;
pub mod secret_storage;

pub use atomic_toml::AtomicTomlFile;
pub use config_storage::ConfigStorage;
pub use secret_storage::SecretStorage;
