//! The command registry: populated once at startup, read-only afterwards.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::{Result, StintError};

/// What a handler tells the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// A registered command's behavior. Handlers render their own success
/// output and return errors for the dispatcher to surface.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome>;
}

/// One registry row.
#[derive(Clone)]
pub struct RegistryEntry {
    pub name: String,
    pub help_text: String,
    handler: Arc<dyn CommandHandler>,
}

impl RegistryEntry {
    pub async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        self.handler.run(args, ctx).await
    }
}

/// Name-to-handler mapping. Registration happens once, synchronously,
/// before the interactive loop starts; afterwards the registry is only
/// read, so it can be shared without locking.
#[derive(Default)]
pub struct CommandRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. A duplicate name is a programming error and
    /// fails fast at startup.
    pub fn register(
        &mut self,
        name: &str,
        handler: Arc<dyn CommandHandler>,
        help_text: &str,
    ) -> Result<()> {
        let name = name.to_lowercase();
        if self.entries.contains_key(&name) {
            return Err(StintError::internal(format!(
                "command '{}' is already registered",
                name
            )));
        }
        self.entries.insert(
            name.clone(),
            RegistryEntry {
                name,
                help_text: help_text.to_string(),
                handler,
            },
        );
        Ok(())
    }

    /// Looks up a command by (case-insensitive) name.
    pub fn lookup(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(&name.to_lowercase())
    }

    /// All entries, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// Registered names, for the completion helper.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::memory_context;

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn run(&self, _args: &str, _ctx: &mut AppContext) -> Result<Outcome> {
            Ok(Outcome::Continue)
        }
    }

    #[test]
    fn register_and_lookup_are_case_insensitive() {
        let mut registry = CommandRegistry::new();
        registry.register("Start", Arc::new(Noop), "Start a timer").unwrap();

        assert!(registry.lookup("start").is_some());
        assert!(registry.lookup("START").is_some());
        assert!(registry.lookup("stop").is_none());
    }

    #[test]
    fn duplicate_registration_fails_fast() {
        let mut registry = CommandRegistry::new();
        registry.register("start", Arc::new(Noop), "Start a timer").unwrap();

        let err = registry.register("start", Arc::new(Noop), "again").unwrap_err();
        assert!(matches!(err, StintError::Internal(_)));
    }

    #[test]
    fn entries_come_back_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register("stop", Arc::new(Noop), "").unwrap();
        registry.register("note", Arc::new(Noop), "").unwrap();
        registry.register("start", Arc::new(Noop), "").unwrap();

        let names: Vec<_> = registry.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["note", "start", "stop"]);
    }

    #[tokio::test]
    async fn registered_handler_runs() {
        let mut registry = CommandRegistry::new();
        registry.register("start", Arc::new(Noop), "").unwrap();
        let mut ctx = memory_context();

        let outcome = registry.lookup("start").unwrap().run("SB-1", &mut ctx).await.unwrap();
        assert_eq!(outcome, Outcome::Continue);
    }
}
