//! Portal submission commands: `/register-time` and
//! `/accounting register-hours`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use colored::Colorize;
use tracing::info;

use stint_core::command::registry::{CommandHandler, CommandRegistry, Outcome};
use stint_core::portal::{PortalEntry, TimePortal};
use stint_core::time_entry::TimeEntryRepository;
use stint_core::{AppContext, Result, StintError};

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(
        "register-time",
        Arc::new(RegisterTimeHandler),
        "/register-time <date|today> <hours> - submit hours to the portal",
    )?;
    registry.register(
        "accounting",
        Arc::new(AccountingHandler),
        "/accounting register-hours <date|today> <hours> <description> - submit described hours",
    )?;
    Ok(())
}

fn parse_date(raw: &str, usage: &str) -> Result<NaiveDate> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(Utc::now().date_naive());
    }
    raw.parse::<NaiveDate>().map_err(|_| {
        StintError::parse(format!("'{}' is not a date (YYYY-MM-DD). usage: {}", raw, usage))
    })
}

fn parse_hours(raw: &str, usage: &str) -> Result<f64> {
    let hours = raw
        .parse::<f64>()
        .map_err(|_| StintError::parse(format!("'{}' is not a number. usage: {}", raw, usage)))?;
    if !(hours > 0.0 && hours <= 24.0) {
        return Err(StintError::parse(
            "hours must be greater than 0 and at most 24",
        ));
    }
    Ok(hours)
}

async fn submit(ctx: &AppContext, entry: PortalEntry) -> Result<()> {
    ctx.portal.submit_entry(&entry).await?;
    info!(date = %entry.date, hours = entry.hours, "time entry submitted to portal");
    println!(
        "{}",
        format!(
            "Submitted {:.2}h for {} ({}).",
            entry.hours, entry.date, entry.description
        )
        .green()
    );

    let marked = mark_day_submitted(ctx, entry.date)?;
    if marked > 0 {
        println!(
            "{}",
            format!("{} recorded entries marked as submitted.", marked).bright_black()
        );
    }
    Ok(())
}

/// Flags the day's recorded entries as submitted once the portal accepted
/// the hours, so they are not counted against a second submission.
fn mark_day_submitted(ctx: &AppContext, date: NaiveDate) -> Result<usize> {
    let mut marked = 0;
    for entry in ctx.time_entries.for_day(date)? {
        if !entry.submitted {
            ctx.time_entries.mark_submitted(entry.id)?;
            marked += 1;
        }
    }
    Ok(marked)
}

/// Description used when none is given: the active task, or the tickets
/// time was recorded on that day.
fn derive_description(ctx: &AppContext, date: NaiveDate) -> Result<String> {
    if let Some(task) = &ctx.session.active_task_id {
        return Ok(format!("Work on {}", task));
    }

    let entries = ctx.time_entries.for_day(date)?;
    let mut keys: Vec<String> = Vec::new();
    for entry in &entries {
        if !keys.contains(&entry.ticket_key) {
            keys.push(entry.ticket_key.clone());
        }
    }
    if keys.is_empty() {
        return Err(StintError::state(format!(
            "no active task and no time recorded on {}; \
             use /accounting register-hours <date> <hours> <description>",
            date
        )));
    }
    Ok(format!("Work on {}", keys.join(", ")))
}

struct RegisterTimeHandler;

#[async_trait]
impl CommandHandler for RegisterTimeHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        const USAGE: &str = "/register-time <date|today> <hours>";

        let mut words = args.split_whitespace();
        let (date_raw, hours_raw) = match (words.next(), words.next()) {
            (Some(date), Some(hours)) => (date, hours),
            _ => return Err(StintError::parse(format!("usage: {}", USAGE))),
        };

        let date = parse_date(date_raw, USAGE)?;
        let hours = parse_hours(hours_raw, USAGE)?;
        let description = derive_description(ctx, date)?;

        submit(ctx, PortalEntry { date, hours, description }).await?;
        Ok(Outcome::Continue)
    }
}

struct AccountingHandler;

#[async_trait]
impl CommandHandler for AccountingHandler {
    async fn run(&self, args: &str, ctx: &mut AppContext) -> Result<Outcome> {
        const USAGE: &str = "/accounting register-hours <date|today> <hours> <description>";

        let rest = args
            .trim()
            .strip_prefix("register-hours")
            .ok_or_else(|| StintError::parse(format!("usage: {}", USAGE)))?
            .trim();

        let mut words = rest.split_whitespace();
        let (date_raw, hours_raw) = match (words.next(), words.next()) {
            (Some(date), Some(hours)) => (date, hours),
            _ => return Err(StintError::parse(format!("usage: {}", USAGE))),
        };
        let description = words.collect::<Vec<_>>().join(" ");
        if description.is_empty() {
            return Err(StintError::parse(format!("usage: {}", USAGE)));
        }

        let date = parse_date(date_raw, USAGE)?;
        let hours = parse_hours(hours_raw, USAGE)?;

        submit(ctx, PortalEntry { date, hours, description }).await?;
        Ok(Outcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use stint_core::session::ClosedSpan;
    use stint_core::time_entry::{TimeEntry, TimeEntryRepository};

    #[tokio::test]
    async fn register_time_uses_the_active_task_as_description() {
        let (handles, mut ctx) = TestContext::new();
        ctx.session.start("SB-1").unwrap();

        RegisterTimeHandler
            .run("2024-03-10 7.5", &mut ctx)
            .await
            .unwrap();

        let submitted = handles.portal.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].hours, 7.5);
        assert_eq!(submitted[0].description, "Work on SB-1");
        assert_eq!(submitted[0].date, "2024-03-10".parse().unwrap());
    }

    #[tokio::test]
    async fn submission_marks_the_days_entries_submitted() {
        let (handles, mut ctx) = TestContext::new();
        ctx.session.start("SB-1").unwrap();
        let now = Utc::now();
        for key in ["SB-1", "SB-2"] {
            ctx.time_entries
                .add(TimeEntry::from_span(&ClosedSpan {
                    task_id: key.to_string(),
                    started_at: now,
                    ended_at: now,
                    seconds: 1800,
                }))
                .unwrap();
        }

        RegisterTimeHandler.run("today 8", &mut ctx).await.unwrap();

        let entries = handles.time_entries.entries.lock().unwrap();
        assert!(entries.iter().all(|e| e.submitted));
    }

    #[tokio::test]
    async fn register_time_falls_back_to_recorded_tickets() {
        let (handles, mut ctx) = TestContext::new();
        let now = Utc::now();
        for key in ["SB-1", "SB-2", "SB-1"] {
            ctx.time_entries
                .add(TimeEntry::from_span(&ClosedSpan {
                    task_id: key.to_string(),
                    started_at: now,
                    ended_at: now,
                    seconds: 600,
                }))
                .unwrap();
        }

        RegisterTimeHandler.run("today 8", &mut ctx).await.unwrap();

        let submitted = handles.portal.submitted.lock().unwrap();
        assert_eq!(submitted[0].description, "Work on SB-1, SB-2");
    }

    #[tokio::test]
    async fn register_time_with_nothing_to_describe_is_a_state_error() {
        let (handles, mut ctx) = TestContext::new();
        let err = RegisterTimeHandler
            .run("2024-03-10 8", &mut ctx)
            .await
            .unwrap_err();
        assert!(err.is_state());
        assert!(handles.portal.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn hours_out_of_range_are_rejected() {
        let (_handles, mut ctx) = TestContext::new();
        ctx.session.start("SB-1").unwrap();

        for bad in ["0", "-1", "25", "lots"] {
            let err = RegisterTimeHandler
                .run(&format!("today {}", bad), &mut ctx)
                .await
                .unwrap_err();
            assert!(matches!(err, StintError::Parse(_)), "hours '{}'", bad);
        }
    }

    #[tokio::test]
    async fn accounting_takes_an_explicit_description() {
        let (handles, mut ctx) = TestContext::new();

        AccountingHandler
            .run("register-hours 2024-03-10 6 sprint planning and reviews", &mut ctx)
            .await
            .unwrap();

        let submitted = handles.portal.submitted.lock().unwrap();
        assert_eq!(submitted[0].description, "sprint planning and reviews");
        assert_eq!(submitted[0].hours, 6.0);
    }

    #[tokio::test]
    async fn accounting_requires_the_subcommand_and_description() {
        let (_handles, mut ctx) = TestContext::new();

        let err = AccountingHandler
            .run("2024-03-10 6 text", &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, StintError::Parse(_)));

        let err = AccountingHandler
            .run("register-hours 2024-03-10 6", &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, StintError::Parse(_)));
    }
}
