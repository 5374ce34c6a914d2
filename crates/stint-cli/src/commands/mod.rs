//! Command handlers and their registration.

pub mod accounting;
pub mod notes;
pub mod report;
pub mod tasks;
pub mod timer;

use stint_core::command::registry::CommandRegistry;
use stint_core::Result;

/// Builds the full registry. Registration order does not matter; the
/// registry keeps entries sorted by name.
pub fn register_all(registry: &mut CommandRegistry) -> Result<()> {
    timer::register(registry)?;
    notes::register(registry)?;
    tasks::register(registry)?;
    accounting::register(registry)?;
    report::register(registry)?;
    Ok(())
}
