//! Routes parsed input lines to command handlers.

use crate::command::line::{Command, InputLine};
use crate::command::registry::{CommandRegistry, Outcome};
use crate::context::AppContext;
use crate::error::StintError;

/// The result of dispatching one input line. The REPL renders these; the
/// dispatcher itself never prints and never lets a handler failure escape.
#[derive(Debug)]
pub enum Dispatched {
    /// Handled (or an empty line); keep reading input.
    Continue,
    /// `/exit`, `/quit`, or a handler that requested shutdown.
    Exit,
    /// `/help [topic]`; the caller renders from the registry it owns.
    Help { topic: Option<String> },
    /// No such command; suggest `/help`.
    Unknown { name: String },
    /// Free text arrived with no active task to attach it to.
    NoActiveTask,
    /// A handler failed; the error is recovered and shown, the loop
    /// continues.
    Failed(StintError),
}

/// Dispatches one raw input line.
///
/// Free text becomes an implicit `note add` against the active task.
/// `help`, `exit` and `quit` are builtins resolved before the registry so
/// that help can render the registry itself.
pub async fn dispatch(
    raw: &str,
    registry: &CommandRegistry,
    ctx: &mut AppContext,
) -> Dispatched {
    match InputLine::parse(raw) {
        InputLine::Empty => Dispatched::Continue,
        InputLine::Text(text) => dispatch_note_text(&text, registry, ctx).await,
        InputLine::Command(cmd) => dispatch_command(&cmd, registry, ctx).await,
    }
}

async fn dispatch_note_text(
    text: &str,
    registry: &CommandRegistry,
    ctx: &mut AppContext,
) -> Dispatched {
    if ctx.session.active_task_id.is_none() {
        return Dispatched::NoActiveTask;
    }
    let Some(entry) = registry.lookup("note") else {
        return Dispatched::Unknown {
            name: "note".to_string(),
        };
    };
    let args = format!("add {}", text);
    match entry.run(&args, ctx).await {
        Ok(Outcome::Continue) => Dispatched::Continue,
        Ok(Outcome::Exit) => Dispatched::Exit,
        Err(err) => Dispatched::Failed(err),
    }
}

async fn dispatch_command(
    cmd: &Command,
    registry: &CommandRegistry,
    ctx: &mut AppContext,
) -> Dispatched {
    match cmd.name.as_str() {
        "help" | "?" => {
            let topic = cmd
                .argument_text
                .split_whitespace()
                .next()
                .map(|s| s.trim_start_matches('/').to_lowercase());
            return Dispatched::Help { topic };
        }
        "exit" | "quit" => return Dispatched::Exit,
        _ => {}
    }

    let Some(entry) = registry.lookup(&cmd.name) else {
        return Dispatched::Unknown {
            name: cmd.name.clone(),
        };
    };
    match entry.run(&cmd.argument_text, ctx).await {
        Ok(Outcome::Continue) => Dispatched::Continue,
        Ok(Outcome::Exit) => Dispatched::Exit,
        Err(err) => Dispatched::Failed(err),
    }
}
