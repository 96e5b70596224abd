//! Focus session state as seen by the client.
//!
//! The backend owns the session record; the client only keeps a handle to
//! it while a focus countdown runs, plus the observable controller status.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::timer::{format_duration_mmss, Mode, TimerState};
use crate::api::{ActiveSession, SessionId, StartedSession, TaskId};

/// Handle to the server-side session the controller opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSession {
    /// Server-assigned session ID
    pub session_id: SessionId,
    /// Task the session is bound to
    pub task_id: TaskId,
    /// Server clock at creation
    pub start_time: NaiveDateTime,
}

impl OpenSession {
    /// Handle for a session that was just started for `task_id`.
    #[must_use]
    pub const fn started(task_id: TaskId, started: &StartedSession) -> Self {
        Self {
            session_id: started.session_id,
            task_id,
            start_time: started.start_time,
        }
    }
}

/// Controller status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No countdown
    Inactive,
    /// Counting down
    Active,
    /// Countdown stopped, session (if any) still open
    Paused,
    /// End-of-focus call in flight
    Transitioning,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "Inactive"),
            Self::Active => write!(f, "Active"),
            Self::Paused => write!(f, "Paused"),
            Self::Transitioning => write!(f, "Transitioning"),
        }
    }
}

/// Everything a view needs to draw the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Controller status
    pub status: Status,
    /// Countdown
    pub timer: TimerState,
    /// Open server-side session
    pub session: Option<OpenSession>,
    /// Task chosen for the next start
    pub selected_task: Option<TaskId>,
}

impl Snapshot {
    /// Idle snapshot with a full focus countdown.
    #[must_use]
    pub const fn idle(focus_seconds: i64, selected_task: Option<TaskId>) -> Self {
        Self {
            status: Status::Inactive,
            timer: TimerState {
                mode: Mode::Focus,
                remaining_seconds: focus_seconds,
                paused: false,
            },
            session: None,
            selected_task,
        }
    }

    /// Remaining time as MM:SS.
    #[must_use]
    pub fn clock(&self) -> String {
        format_duration_mmss(chrono::Duration::seconds(self.timer.remaining_seconds))
    }

    /// One-line status for log output and the headless runner.
    #[must_use]
    pub fn format_status(&self) -> String {
        let session = self
            .session
            .as_ref()
            .map_or_else(String::new, |s| format!(" (session {})", s.session_id));
        format!(
            "{} {} {}{session}",
            self.status,
            self.timer.mode,
            self.clock()
        )
    }
}

/// Minutes elapsed since `start_time`, never negative.
#[must_use]
pub fn minutes_since(start_time: NaiveDateTime, now: NaiveDateTime) -> i64 {
    now.signed_duration_since(start_time).num_minutes().max(0)
}

/// "started N minutes ago" relative to `now`.
#[must_use]
pub fn format_started_ago(start_time: NaiveDateTime, now: NaiveDateTime) -> String {
    match minutes_since(start_time, now) {
        0 => "started less than a minute ago".to_string(),
        1 => "started 1 minute ago".to_string(),
        m if m < 120 => format!("started {m} minutes ago"),
        m => format!("started {} hours ago", m / 60),
    }
}

/// Describe a session left open by an earlier client.
#[must_use]
pub fn describe_stale(session: &ActiveSession) -> String {
    let task = session
        .task_id
        .map_or_else(String::new, |id| format!(" for task {id}"));
    format!(
        "Session {}{task} is still open, {}",
        session.session_id,
        format_started_ago(session.start_time, Local::now().naive_local())
    )
}
