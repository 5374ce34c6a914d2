//! The single current-task/timer session shared by all command handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StintError};

/// The session state: which ticket is active and how long it has been
/// worked on.
///
/// Invariant: `timer_started_at` is `Some` if and only if the timer is
/// currently running. `accumulated_seconds` only advances when the timer is
/// stopped or queried; a stop always folds the elapsed span and clears the
/// running flag in the same operation, so an interrupted process never
/// observes one without the other.
///
/// Policy: `start` refuses to run while any timer is running. Changing tasks
/// with a live timer is an explicit `switch`, which closes the old span
/// first. This keeps "I forgot to stop" visible instead of silently folding
/// time into the wrong ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Ticket key of the active task, if any.
    pub active_task_id: Option<String>,
    /// When the running timer was started. `None` while stopped.
    pub timer_started_at: Option<DateTime<Utc>>,
    /// Seconds accumulated against the active task while stopped.
    #[serde(default)]
    pub accumulated_seconds: i64,
}

/// A closed timer span, returned by `stop` and `switch` so the caller can
/// record a time entry for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSpan {
    pub task_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Duration of this span alone, not the session total.
    pub seconds: i64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a timer is currently running.
    pub fn is_running(&self) -> bool {
        self.timer_started_at.is_some()
    }

    /// Starts the timer for `task_id`, resetting accumulated time for the
    /// new task context.
    ///
    /// Errors with `State` if any timer is already running; use
    /// [`Session::switch`] to change tasks without losing the open span.
    pub fn start(&mut self, task_id: &str) -> Result<()> {
        self.start_at(task_id, Utc::now())
    }

    /// Clock-injected variant of [`Session::start`].
    pub fn start_at(&mut self, task_id: &str, now: DateTime<Utc>) -> Result<()> {
        if let Some(running) = self.running_task() {
            return Err(StintError::state(format!(
                "a timer is already running for '{}'; use /switch {} to change tasks",
                running, task_id
            )));
        }
        self.active_task_id = Some(task_id.to_string());
        self.accumulated_seconds = 0;
        self.timer_started_at = Some(now);
        Ok(())
    }

    /// Switches to `task_id`: closes the running span (if any) and starts
    /// the new task's timer in one operation.
    ///
    /// Returns the closed span of the previous task so the caller can
    /// persist a time entry for it. Switching while stopped simply starts
    /// the new task's timer.
    pub fn switch(&mut self, task_id: &str) -> Result<Option<ClosedSpan>> {
        self.switch_at(task_id, Utc::now())
    }

    /// Clock-injected variant of [`Session::switch`].
    pub fn switch_at(&mut self, task_id: &str, now: DateTime<Utc>) -> Result<Option<ClosedSpan>> {
        let closed = if self.is_running() {
            Some(self.stop_at(now)?)
        } else {
            None
        };
        self.active_task_id = Some(task_id.to_string());
        self.accumulated_seconds = 0;
        self.timer_started_at = Some(now);
        Ok(closed)
    }

    /// Stops the running timer, folding the elapsed span into
    /// `accumulated_seconds`.
    ///
    /// Errors with `State` if no timer is running.
    pub fn stop(&mut self) -> Result<ClosedSpan> {
        self.stop_at(Utc::now())
    }

    /// Clock-injected variant of [`Session::stop`].
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Result<ClosedSpan> {
        let started_at = self
            .timer_started_at
            .ok_or_else(|| StintError::state("no timer is running"))?;
        let task_id = self
            .active_task_id
            .clone()
            .ok_or_else(|| StintError::internal("timer running without an active task"))?;

        let seconds = (now - started_at).num_seconds().max(0);
        self.accumulated_seconds += seconds;
        self.timer_started_at = None;

        Ok(ClosedSpan {
            task_id,
            started_at,
            ended_at: now,
            seconds,
        })
    }

    /// Restarts the timer for the active task without resetting accumulated
    /// seconds.
    ///
    /// Errors with `State` if no task is active or the timer is already
    /// running.
    pub fn resume(&mut self) -> Result<()> {
        self.resume_at(Utc::now())
    }

    /// Clock-injected variant of [`Session::resume`].
    pub fn resume_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.active_task_id.is_none() {
            return Err(StintError::state("no active task to resume; use /start <id>"));
        }
        if self.is_running() {
            return Err(StintError::state("the timer is already running"));
        }
        self.timer_started_at = Some(now);
        Ok(())
    }

    /// Total seconds against the active task: accumulated time plus the
    /// running increment, if any.
    pub fn elapsed(&self) -> i64 {
        self.elapsed_at(Utc::now())
    }

    /// Clock-injected variant of [`Session::elapsed`].
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> i64 {
        let running = self
            .timer_started_at
            .map(|started| (now - started).num_seconds().max(0))
            .unwrap_or(0);
        self.accumulated_seconds + running
    }

    /// The task the running timer belongs to, or `None` while stopped.
    pub fn running_task(&self) -> Option<&str> {
        if self.is_running() {
            self.active_task_id.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(offset_secs: i64) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z").unwrap().with_timezone(&Utc)
            + Duration::seconds(offset_secs)
    }

    #[test]
    fn start_sets_task_and_runs_timer() {
        let mut session = Session::new();
        session.start_at("SB-1", at(0)).unwrap();

        assert_eq!(session.active_task_id.as_deref(), Some("SB-1"));
        assert!(session.is_running());
        assert_eq!(session.accumulated_seconds, 0);
    }

    #[test]
    fn start_while_running_is_a_state_error() {
        let mut session = Session::new();
        session.start_at("SB-1", at(0)).unwrap();

        let err = session.start_at("SB-2", at(10)).unwrap_err();
        assert!(err.is_state());
        // The failed start must not touch the session.
        assert_eq!(session.active_task_id.as_deref(), Some("SB-1"));
        assert!(session.is_running());
    }

    #[test]
    fn stop_folds_elapsed_and_clears_running_flag() {
        let mut session = Session::new();
        session.start_at("SB-1", at(0)).unwrap();

        let span = session.stop_at(at(90)).unwrap();
        assert_eq!(span.task_id, "SB-1");
        assert_eq!(span.seconds, 90);
        assert!(!session.is_running());
        assert_eq!(session.accumulated_seconds, 90);
        assert_eq!(session.elapsed_at(at(1000)), 90);
    }

    #[test]
    fn stop_without_running_timer_fails() {
        let mut session = Session::new();
        assert!(session.stop_at(at(0)).unwrap_err().is_state());

        session.start_at("SB-1", at(0)).unwrap();
        session.stop_at(at(5)).unwrap();
        assert!(session.stop_at(at(10)).unwrap_err().is_state());
    }

    #[test]
    fn elapsed_is_monotonic_while_running() {
        let mut session = Session::new();
        session.start_at("SB-1", at(0)).unwrap();

        let mut previous = 0;
        for offset in [1, 5, 5, 42, 300] {
            let elapsed = session.elapsed_at(at(offset));
            assert!(elapsed >= previous);
            previous = elapsed;
        }
        assert_eq!(previous, 300);
    }

    #[test]
    fn resume_keeps_accumulated_seconds() {
        let mut session = Session::new();
        session.start_at("SB-1", at(0)).unwrap();
        session.stop_at(at(60)).unwrap();

        session.resume_at(at(120)).unwrap();
        assert!(session.is_running());
        assert_eq!(session.elapsed_at(at(150)), 90);
    }

    #[test]
    fn resume_without_task_or_while_running_fails() {
        let mut session = Session::new();
        assert!(session.resume_at(at(0)).unwrap_err().is_state());

        session.start_at("SB-1", at(0)).unwrap();
        assert!(session.resume_at(at(10)).unwrap_err().is_state());
    }

    #[test]
    fn switch_closes_the_open_span_and_starts_the_new_timer() {
        let mut session = Session::new();
        session.start_at("SB-1", at(0)).unwrap();

        let closed = session.switch_at("SB-2", at(100)).unwrap().unwrap();
        assert_eq!(closed.task_id, "SB-1");
        assert_eq!(closed.seconds, 100);

        assert_eq!(session.active_task_id.as_deref(), Some("SB-2"));
        assert!(session.is_running());
        assert_eq!(session.accumulated_seconds, 0);

        // Spans across both tasks cover the full wall-clock interval.
        let second = session.stop_at(at(160)).unwrap();
        assert_eq!(closed.seconds + second.seconds, 160);
    }

    #[test]
    fn switch_while_stopped_starts_without_closing_a_span() {
        let mut session = Session::new();
        session.start_at("SB-1", at(0)).unwrap();
        session.stop_at(at(30)).unwrap();

        let closed = session.switch_at("SB-2", at(60)).unwrap();
        assert!(closed.is_none());
        assert_eq!(session.active_task_id.as_deref(), Some("SB-2"));
        assert!(session.is_running());
        assert_eq!(session.accumulated_seconds, 0);
    }

    #[test]
    fn state_round_trips_through_toml() {
        let mut session = Session::new();
        session.start_at("SB-7", at(0)).unwrap();
        session.stop_at(at(45)).unwrap();

        let text = toml::to_string(&session).unwrap();
        let loaded: Session = toml::from_str(&text).unwrap();
        assert_eq!(loaded, session);
    }
}
