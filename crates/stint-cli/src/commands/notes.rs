//! Note commands: `/note add|list|view|delete`.

use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;

use stint_core::command::registry::{CommandHandler, CommandRegistry, Outcome};
use stint_core::note::{NewNote, Note, NoteKind, NoteRepository};
use stint_core::{AppContext, Result, StintError};

const USAGE: &str = "/note add [blocker:|decision:|idea:] <text> | list [n] | view <id> | delete <id>";
const DEFAULT_LIST_LIMIT: usize = 10;

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(
        "note",
        Arc::new(NoteHandler),
        "/note add <text> | list [n] | view <id> | delete <id> - local notes",
    )
}

struct NoteHandler;

#[async_trait]
impl CommandHandler for NoteHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        let (sub, rest) = match args.trim().split_once(char::is_whitespace) {
            Some((sub, rest)) => (sub, rest.trim()),
            None => (args.trim(), ""),
        };

        match sub.to_lowercase().as_str() {
            "" | "list" => list(ctx, rest),
            "add" => add(ctx, rest),
            "view" => view(ctx, rest),
            "delete" => delete(ctx, rest),
            other => Err(StintError::parse(format!(
                "unknown note subcommand '{}'. usage: {}",
                other, USAGE
            ))),
        }?;
        Ok(Outcome::Continue)
    }
}

fn add(ctx: &AppContext, text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(StintError::parse(format!("usage: {}", USAGE)));
    }
    let (kind, content) = split_kind(text);
    let note = ctx.notes.add(NewNote {
        kind,
        content: content.to_string(),
        ticket_key: ctx.session.active_task_id.clone(),
    })?;
    println!("{}", format!("Note #{} added.", note.id).green());
    Ok(())
}

/// A leading `blocker:`, `decision:` or `idea:` marker selects the kind;
/// everything else is a plain note.
fn split_kind(text: &str) -> (NoteKind, &str) {
    let Some((marker, rest)) = text.split_once(':') else {
        return (NoteKind::Note, text);
    };
    let kind = match marker.trim().to_lowercase().as_str() {
        "blocker" => NoteKind::Blocker,
        "decision" => NoteKind::Decision,
        "idea" => NoteKind::Idea,
        _ => return (NoteKind::Note, text),
    };
    (kind, rest.trim())
}

fn list(ctx: &AppContext, rest: &str) -> Result<()> {
    let limit = match rest.split_whitespace().next() {
        Some(n) => n
            .parse::<usize>()
            .map_err(|_| StintError::parse(format!("'{}' is not a count. usage: {}", n, USAGE)))?,
        None => DEFAULT_LIST_LIMIT,
    };

    let notes = ctx.notes.list_recent(limit)?;
    if notes.is_empty() {
        println!("{}", "No notes yet.".bright_black());
        return Ok(());
    }
    for note in &notes {
        print_note_line(note);
    }
    Ok(())
}

fn view(ctx: &AppContext, rest: &str) -> Result<()> {
    let id = parse_id(rest)?;
    let note = ctx.notes.get(id)?;
    println!(
        "{} {}",
        format!("#{}", note.id).cyan(),
        note.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(key) = &note.ticket_key {
        println!("Ticket: {}", key.cyan());
    }
    println!("Kind: {}", note.kind);
    println!("{}", note.content);
    Ok(())
}

fn delete(ctx: &AppContext, rest: &str) -> Result<()> {
    let id = parse_id(rest)?;
    ctx.notes.delete(id)?;
    println!("{}", format!("Note #{} deleted.", id).green());
    Ok(())
}

fn parse_id(rest: &str) -> Result<u64> {
    let raw = rest.split_whitespace().next().unwrap_or_default();
    raw.parse::<u64>()
        .map_err(|_| StintError::parse(format!("'{}' is not a note id. usage: {}", raw, USAGE)))
}

fn print_note_line(note: &Note) {
    let ticket = note
        .ticket_key
        .as_deref()
        .map(|key| format!(" ({})", key))
        .unwrap_or_default();
    println!(
        "{} [{}]{} {}",
        format!("#{}", note.id).cyan(),
        note.kind,
        ticket.bright_black(),
        note.content
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[tokio::test]
    async fn add_attaches_the_active_task() {
        let (handles, mut ctx) = TestContext::new();
        ctx.session.start("SB-1").unwrap();

        NoteHandler.run("add tried the retry path", &mut ctx).await.unwrap();

        let notes = handles.notes.notes.lock().unwrap();
        assert_eq!(notes[0].content, "tried the retry path");
        assert_eq!(notes[0].ticket_key.as_deref(), Some("SB-1"));
        assert_eq!(notes[0].kind, NoteKind::Note);
    }

    #[tokio::test]
    async fn add_without_active_task_still_works() {
        let (handles, mut ctx) = TestContext::new();
        NoteHandler.run("add general thought", &mut ctx).await.unwrap();
        assert!(handles.notes.notes.lock().unwrap()[0].ticket_key.is_none());
    }

    #[tokio::test]
    async fn marker_prefix_selects_the_kind() {
        let (handles, mut ctx) = TestContext::new();
        NoteHandler
            .run("add blocker: waiting on code review", &mut ctx)
            .await
            .unwrap();

        let notes = handles.notes.notes.lock().unwrap();
        assert_eq!(notes[0].kind, NoteKind::Blocker);
        assert_eq!(notes[0].content, "waiting on code review");
    }

    #[tokio::test]
    async fn unknown_marker_is_kept_as_content() {
        let (handles, mut ctx) = TestContext::new();
        NoteHandler
            .run("add reminder: check the logs", &mut ctx)
            .await
            .unwrap();

        let notes = handles.notes.notes.lock().unwrap();
        assert_eq!(notes[0].kind, NoteKind::Note);
        assert_eq!(notes[0].content, "reminder: check the logs");
    }

    #[tokio::test]
    async fn subcommands_match_case_insensitively() {
        let (handles, mut ctx) = TestContext::new();
        NoteHandler.run("ADD shouted note", &mut ctx).await.unwrap();
        NoteHandler.run("List", &mut ctx).await.unwrap();

        let notes = handles.notes.notes.lock().unwrap();
        assert_eq!(notes[0].content, "shouted note");
    }

    #[tokio::test]
    async fn empty_add_is_a_parse_error() {
        let (_handles, mut ctx) = TestContext::new();
        let err = NoteHandler.run("add", &mut ctx).await.unwrap_err();
        assert!(matches!(err, StintError::Parse(_)));
    }

    #[tokio::test]
    async fn delete_of_missing_note_is_not_found() {
        let (_handles, mut ctx) = TestContext::new();
        let err = NoteHandler.run("delete 42", &mut ctx).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn bare_note_command_lists() {
        let (_handles, mut ctx) = TestContext::new();
        NoteHandler.run("", &mut ctx).await.unwrap();
        NoteHandler.run("list 5", &mut ctx).await.unwrap();
    }

    #[tokio::test]
    async fn bad_id_is_a_parse_error() {
        let (_handles, mut ctx) = TestContext::new();
        let err = NoteHandler.run("view abc", &mut ctx).await.unwrap_err();
        assert!(matches!(err, StintError::Parse(_)));
    }
}
