//! Command parsing, registry, and dispatch.

pub mod dispatcher;
pub mod line;
pub mod registry;

pub use dispatcher::{dispatch, Dispatched};
pub use line::{Command, InputLine, COMMAND_PREFIX};
pub use registry::{CommandHandler, CommandRegistry, Outcome, RegistryEntry};
