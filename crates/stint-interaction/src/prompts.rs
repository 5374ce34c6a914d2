//! Prompt construction for the summarizer.
//!
//! Pure string builders so the wording can be unit tested without an API
//! call. The summarizer trait takes one prompt string; everything the model
//! needs is rendered in here.

use chrono::NaiveDate;

use stint_core::note::Note;
use stint_core::ticket::Ticket;
use stint_core::time_entry::{format_seconds, TimeEntry};

/// Summarizes a set of ticket titles into a short description, used when
/// registering portal hours.
pub fn summarize_titles(titles: &[String]) -> String {
    format!(
        "You are an assistant that summarizes multiple issue titles into a concise summary.\n\
         Given the following issue titles, create a brief summary that captures the main\n\
         themes and purposes of these issues collectively.\n\
         \n\
         Issue Titles:\n\
         {}\n\
         \n\
         Your summary should:\n\
         1. Be concise (1-3 sentences)\n\
         2. Capture the main themes across all issues\n\
         3. Be written in a clear, professional style\n\
         \n\
         Summary:",
        bullet_lines(titles)
    )
}

/// Daily status report over active and completed tickets.
pub fn daily_report(date: NaiveDate, active: &[Ticket], completed: &[Ticket]) -> String {
    format!(
        "You are an assistant that generates daily work reports. Given the following\n\
         lists of active and completed tasks for {}, generate a professional daily report.\n\
         \n\
         Active Tasks:\n\
         {}\n\
         \n\
         Completed Tasks:\n\
         {}\n\
         \n\
         Your report should:\n\
         1. Summarize completed work with specific accomplishments\n\
         2. Describe ongoing work and its current status\n\
         3. Be written in a professional, first-person style\n\
         4. Be concise but comprehensive\n\
         \n\
         Daily Report:",
        date.format("%Y-%m-%d"),
        ticket_lines(active),
        ticket_lines(completed)
    )
}

/// Weekly status report over active and completed tickets.
pub fn weekly_report(
    start: NaiveDate,
    end: NaiveDate,
    active: &[Ticket],
    completed: &[Ticket],
) -> String {
    period_report(
        format!("the week of {} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
        "weekly",
        active,
        completed,
    )
}

/// Report over an arbitrary trailing period.
pub fn custom_report(
    start: NaiveDate,
    end: NaiveDate,
    days: u32,
    active: &[Ticket],
    completed: &[Ticket],
) -> String {
    period_report(
        format!(
            "the period of {} to {} ({} days)",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            days
        ),
        "status",
        active,
        completed,
    )
}

fn period_report(period: String, kind: &str, active: &[Ticket], completed: &[Ticket]) -> String {
    format!(
        "You are an assistant that generates work reports. Given the following lists of\n\
         active and completed tasks for {}, generate a professional report.\n\
         \n\
         Active Tasks:\n\
         {}\n\
         \n\
         Completed Tasks:\n\
         {}\n\
         \n\
         Your report should:\n\
         1. Summarize completed work with specific accomplishments\n\
         2. Describe ongoing work and its current status\n\
         3. Group related tasks together\n\
         4. Highlight key achievements and milestones\n\
         5. Be written in a professional, first-person style suitable for a {} report\n\
         6. Be concise but comprehensive\n\
         \n\
         Report:",
        period,
        ticket_lines(active),
        ticket_lines(completed),
        kind
    )
}

/// Summary of one day's local activity: notes taken and time recorded.
pub fn work_summary(date: NaiveDate, notes: &[Note], entries: &[TimeEntry]) -> String {
    format!(
        "You are an assistant that summarizes a developer's working day. Given the notes\n\
         taken and the time recorded on {}, write a short first-person summary of the\n\
         day's work (2-5 sentences).\n\
         \n\
         Notes:\n\
         {}\n\
         \n\
         Time Recorded:\n\
         {}\n\
         \n\
         Summary:",
        date.format("%Y-%m-%d"),
        note_lines(notes),
        entry_lines(entries)
    )
}

fn bullet_lines(items: &[String]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn ticket_lines(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "(none)".to_string();
    }
    tickets
        .iter()
        .map(|t| format!("- {}: {} [{}]", t.key, t.summary, t.status))
        .collect::<Vec<_>>()
        .join("\n")
}

fn note_lines(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "(none)".to_string();
    }
    notes
        .iter()
        .map(|n| match &n.ticket_key {
            Some(key) => format!("- [{}] ({}) {}", n.kind, key, n.content),
            None => format!("- [{}] {}", n.kind, n.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn entry_lines(entries: &[TimeEntry]) -> String {
    if entries.is_empty() {
        return "(none)".to_string();
    }
    entries
        .iter()
        .map(|e| format!("- {}: {}", e.ticket_key, format_seconds(e.seconds)))
        .collect::<Vec<_>>()
        .join("\n")
}
