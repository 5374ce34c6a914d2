pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod note;
pub mod portal;
pub mod session;
pub mod summarize;
pub mod ticket;
pub mod time_entry;

// Re-export the common error type
pub use context::AppContext;
pub use error::{Result, StintError};
pub use session::Session;
