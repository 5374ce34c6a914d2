//! Ticket commands: `/tasks` and its subcommands.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use colored::Colorize;

use stint_core::command::registry::{CommandHandler, CommandRegistry, Outcome};
use stint_core::ticket::{Ticket, TicketFilter, TicketTracker};
use stint_core::{AppContext, Result, StintError};

const USAGE: &str = "/tasks [todo|active|completed [days]|worked-on [date]|set-status <KEY> <status>|create <summary> :: <description>|subtask <PARENT> <summary> :: <description>|comment <KEY> <text>|<KEY>]";
const DEFAULT_COMPLETED_DAYS: u32 = 7;

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(
        "tasks",
        Arc::new(TasksHandler),
        "/tasks [filter|KEY] - list or inspect tracker tickets",
    )
}

struct TasksHandler;

#[async_trait]
impl CommandHandler for TasksHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        let (sub, rest) = match args.trim().split_once(char::is_whitespace) {
            Some((sub, rest)) => (sub, rest.trim()),
            None => (args.trim(), ""),
        };

        match sub.to_lowercase().as_str() {
            "" | "active" => list(ctx, &TicketFilter::Active, "Active tickets").await,
            "todo" => list(ctx, &TicketFilter::Todo, "To do").await,
            "completed" => {
                let days = parse_days(rest)?;
                list(
                    ctx,
                    &TicketFilter::Completed { days },
                    &format!("Completed in the last {} days", days),
                )
                .await
            }
            "worked-on" => {
                let date = parse_date_or_today(rest)?;
                list(
                    ctx,
                    &TicketFilter::WorkedOn { date },
                    &format!("Worked on {}", date.format("%Y-%m-%d")),
                )
                .await
            }
            "set-status" => set_status(ctx, rest).await,
            "create" => create(ctx, rest).await,
            "subtask" => subtask(ctx, rest).await,
            "comment" => comment(ctx, rest).await,
            _ if looks_like_key(sub) => details(ctx, sub).await,
            other => Err(StintError::parse(format!(
                "unknown tasks subcommand '{}'. usage: {}",
                other, USAGE
            ))),
        }?;
        Ok(Outcome::Continue)
    }
}

fn parse_days(rest: &str) -> Result<u32> {
    match rest.split_whitespace().next() {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            StintError::parse(format!("'{}' is not a day count. usage: {}", raw, USAGE))
        }),
        None => Ok(DEFAULT_COMPLETED_DAYS),
    }
}

fn parse_date_or_today(rest: &str) -> Result<NaiveDate> {
    match rest.split_whitespace().next() {
        Some(raw) => raw.parse::<NaiveDate>().map_err(|_| {
            StintError::parse(format!("'{}' is not a date (YYYY-MM-DD). usage: {}", raw, USAGE))
        }),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Ticket keys look like `SB-123`: a project prefix, a dash, digits.
fn looks_like_key(word: &str) -> bool {
    match word.split_once('-') {
        Some((project, number)) => {
            !project.is_empty()
                && project.chars().all(|c| c.is_ascii_alphanumeric())
                && !number.is_empty()
                && number.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

async fn list(ctx: &AppContext, filter: &TicketFilter, title: &str) -> Result<()> {
    let tickets = ctx.tickets.list(filter).await?;
    if tickets.is_empty() {
        println!("{}", format!("No tickets found for: {}", title).yellow());
        return Ok(());
    }

    println!("{}", format!("{} ({} total)", title, tickets.len()).bold());
    for ticket in &tickets {
        print_ticket_row(ticket);
    }
    Ok(())
}

fn print_ticket_row(ticket: &Ticket) {
    println!(
        "{:<12} {:<60} {:<14} {}",
        ticket.key.cyan(),
        truncate(&ticket.summary, 58),
        ticket.status.green(),
        ticket.priority
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}\u{2026}", cut)
    }
}

async fn details(ctx: &AppContext, key: &str) -> Result<()> {
    let details = ctx.tickets.details(&key.to_uppercase()).await?;
    let t = &details.ticket;

    println!("{} {}", t.key.cyan().bold(), t.summary.bold());
    println!("Status:   {}", t.status.green());
    println!("Priority: {}", t.priority);
    if let Some(assignee) = &t.assignee {
        println!("Assignee: {}", assignee);
    }
    if let Some(reporter) = &details.reporter {
        println!("Reporter: {}", reporter);
    }
    if let Some(created) = details.created {
        println!("Created:  {}", created.format("%Y-%m-%d"));
    }
    if !details.description.is_empty() {
        println!();
        println!("{}", details.description);
    }
    Ok(())
}

async fn set_status(ctx: &AppContext, rest: &str) -> Result<()> {
    let (key, status) = match rest.split_once(char::is_whitespace) {
        Some((key, status)) if !status.trim().is_empty() => (key.to_uppercase(), status.trim()),
        _ => {
            return Err(StintError::parse(
                "usage: /tasks set-status <KEY> <status>",
            ))
        }
    };
    ctx.tickets.set_status(&key, status).await?;
    println!("{}", format!("{} moved to '{}'.", key, status).green());
    Ok(())
}

/// Splits `<summary> :: <description>`; the description is optional.
fn split_summary_description(rest: &str) -> (String, String) {
    match rest.split_once("::") {
        Some((summary, description)) => {
            (summary.trim().to_string(), description.trim().to_string())
        }
        None => (rest.trim().to_string(), String::new()),
    }
}

async fn create(ctx: &AppContext, rest: &str) -> Result<()> {
    let (summary, description) = split_summary_description(rest);
    if summary.is_empty() {
        return Err(StintError::parse(
            "usage: /tasks create <summary> :: <description>",
        ));
    }
    let key = ctx.tickets.create(&summary, &description).await?;
    println!("{}", format!("Created {}.", key).green());
    Ok(())
}

async fn subtask(ctx: &AppContext, rest: &str) -> Result<()> {
    let (parent, rest) = match rest.split_once(char::is_whitespace) {
        Some((parent, rest)) if looks_like_key(parent) => (parent.to_uppercase(), rest.trim()),
        _ => {
            return Err(StintError::parse(
                "usage: /tasks subtask <PARENT> <summary> :: <description>",
            ))
        }
    };
    let (summary, description) = split_summary_description(rest);
    if summary.is_empty() {
        return Err(StintError::parse(
            "usage: /tasks subtask <PARENT> <summary> :: <description>",
        ));
    }
    let key = ctx.tickets.create_subtask(&parent, &summary, &description).await?;
    println!("{}", format!("Created {} under {}.", key, parent).green());
    Ok(())
}

async fn comment(ctx: &AppContext, rest: &str) -> Result<()> {
    let (key, body) = match rest.split_once(char::is_whitespace) {
        Some((key, body)) if !body.trim().is_empty() => (key.to_uppercase(), body.trim()),
        _ => return Err(StintError::parse("usage: /tasks comment <KEY> <text>")),
    };
    ctx.tickets.add_comment(&key, body).await?;
    println!("{}", format!("Comment added to {}.", key).green());
    Ok(())
}
