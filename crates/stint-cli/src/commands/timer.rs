//! Timer commands: `/start`, `/switch`, `/stop`, `/resume`, `/status`.
//!
//! Closed spans are recorded as time entries here, at the moment they
//! close, so the session store stays free of storage concerns.

use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;
use tracing::info;

use stint_core::command::registry::{CommandHandler, CommandRegistry, Outcome};
use stint_core::session::ClosedSpan;
use stint_core::time_entry::{format_seconds, TimeEntry, TimeEntryRepository};
use stint_core::{AppContext, Result, StintError};

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(
        "start",
        Arc::new(StartHandler),
        "/start <KEY> - start the timer on a task",
    )?;
    registry.register(
        "switch",
        Arc::new(SwitchHandler),
        "/switch <KEY> - switch the timer to another task",
    )?;
    registry.register(
        "stop",
        Arc::new(StopHandler),
        "/stop - stop the timer and record the span",
    )?;
    registry.register(
        "resume",
        Arc::new(ResumeHandler),
        "/resume - restart the timer on the active task",
    )?;
    registry.register(
        "status",
        Arc::new(StatusHandler),
        "/status - show the active task and elapsed time",
    )?;
    Ok(())
}

fn required_key(args: &str, usage: &str) -> Result<String> {
    let key = args.split_whitespace().next().unwrap_or_default();
    if key.is_empty() {
        return Err(StintError::parse(format!("usage: {}", usage)));
    }
    Ok(key.to_uppercase())
}

/// Persists a closed span. The session has already been mutated by the
/// time this runs, so a storage failure is reported as exactly that: the
/// timer changed, the entry was lost.
fn record_span(ctx: &AppContext, span: &ClosedSpan) -> Result<()> {
    if let Err(err) = ctx.time_entries.add(TimeEntry::from_span(span)) {
        return Err(StintError::persistence(format!(
            "the timer was updated, but the {} span on {} was not saved: {}",
            format_seconds(span.seconds),
            span.task_id,
            err
        )));
    }
    info!(task = %span.task_id, seconds = span.seconds, "recorded time entry");
    Ok(())
}

struct StartHandler;

#[async_trait]
impl CommandHandler for StartHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        let key = required_key(args, "/start <KEY>")?;
        ctx.session.start(&key)?;
        println!("{}", format!("Timer started on {}", key).green());
        Ok(Outcome::Continue)
    }
}

struct SwitchHandler;

#[async_trait]
impl CommandHandler for SwitchHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        let key = required_key(args, "/switch <KEY>")?;
        if let Some(span) = ctx.session.switch(&key)? {
            record_span(ctx, &span)?;
            println!(
                "{}",
                format!(
                    "Recorded {} on {}",
                    format_seconds(span.seconds),
                    span.task_id
                )
                .bright_black()
            );
        }
        println!("{}", format!("Timer switched to {}", key).green());
        Ok(Outcome::Continue)
    }
}

struct StopHandler;

#[async_trait]
impl CommandHandler for StopHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        let _ = args;
        let span = ctx.session.stop()?;
        record_span(ctx, &span)?;
        println!(
            "{}",
            format!(
                "Timer stopped. {} recorded on {}",
                format_seconds(span.seconds),
                span.task_id
            )
            .green()
        );
        Ok(Outcome::Continue)
    }
}

struct ResumeHandler;

#[async_trait]
impl CommandHandler for ResumeHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        let _ = args;
        ctx.session.resume()?;
        let task = ctx.session.active_task_id.clone().unwrap_or_default();
        println!("{}", format!("Timer resumed on {}", task).green());
        Ok(Outcome::Continue)
    }
}

struct StatusHandler;

#[async_trait]
impl CommandHandler for StatusHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        let _ = args;
        match &ctx.session.active_task_id {
            Some(task) => {
                let state = if ctx.session.is_running() {
                    "running".green()
                } else {
                    "paused".yellow()
                };
                println!(
                    "Active task: {}  [{}]  elapsed {}",
                    task.cyan(),
                    state,
                    format_seconds(ctx.session.elapsed())
                );
            }
            None => println!("{}", "No active task.".bright_black()),
        }
        Ok(Outcome::Continue)
    }
}
