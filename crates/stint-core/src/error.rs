//! Error types for the stint application.

use thiserror::Error;

/// A shared error type for the entire stint application.
///
/// Every variant is recoverable at the interactive loop: the dispatcher
/// converts errors into user-visible messages and keeps reading input.
#[derive(Error, Debug)]
pub enum StintError {
    /// Malformed command arguments. The message carries the usage hint.
    #[error("{0}")]
    Parse(String),

    /// Entity not found (command name, note id, ticket key, ...).
    #[error("{entity_type} not found: '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Invalid session/timer state transition (e.g. stopping a stopped timer).
    #[error("{0}")]
    State(String),

    /// An external collaborator (ticket tracker, portal, LLM) failed.
    #[error("{service}: {message}")]
    Collaborator {
        service: &'static str,
        message: String,
    },

    /// Persisted state could not be read or written.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error (file system operations).
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

impl StintError {
    /// Creates a Parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a NotFound error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a State error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Creates a Collaborator error.
    pub fn collaborator(service: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            service,
            message: message.into(),
        }
    }

    /// Creates a Persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a State error.
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }

    /// Check if this is a Collaborator error.
    pub fn is_collaborator(&self) -> bool {
        matches!(self, Self::Collaborator { .. })
    }

    /// Check if this is a Persistence error.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl From<std::io::Error> for StintError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StintError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StintError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StintError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, StintError>`.
pub type Result<T> = std::result::Result<T, StintError>;
