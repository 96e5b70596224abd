//! Application state for the TUI.

use std::collections::VecDeque;

use crate::api::{ActiveSession, FocusObjective, FocusStats, Task, TaskId};
use crate::features::focus::session::describe_stale;
use crate::features::focus::{CycleDurations, Notice, Snapshot, Status};

/// Notices kept on screen.
const NOTICE_LOG_LEN: usize = 6;

/// A line in the notice log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Text shown
    pub text: String,
    /// Rendered as an error
    pub is_error: bool,
}

/// Application state.
pub struct App {
    /// Tasks available for focusing.
    pub tasks: Vec<Task>,
    /// Currently selected index.
    pub selected: usize,
    /// Latest timer state.
    pub snapshot: Snapshot,
    /// Half-cycle lengths, for the progress gauge.
    pub durations: CycleDurations,
    /// Objectives of the selected task.
    pub objectives: Vec<FocusObjective>,
    /// Latest focus statistics.
    pub stats: Option<FocusStats>,
    /// Session left open by an earlier run.
    pub stale: Option<ActiveSession>,
    /// Recent notices, newest last.
    pub log: VecDeque<LogLine>,
    /// Status message to display.
    pub status: Option<String>,
}

impl App {
    /// Create a new app instance, preselecting `task` when it is in the list.
    #[must_use]
    pub fn new(
        tasks: Vec<Task>,
        task: Option<TaskId>,
        durations: CycleDurations,
        snapshot: Snapshot,
    ) -> Self {
        let selected = task
            .and_then(|id| tasks.iter().position(|t| t.task_id == id))
            .unwrap_or(0);

        Self {
            tasks,
            selected,
            snapshot,
            durations,
            objectives: Vec::new(),
            stats: None,
            stale: None,
            log: VecDeque::with_capacity(NOTICE_LOG_LEN),
            status: Some("Press ? for help".to_string()),
        }
    }

    /// Get the currently selected task.
    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    /// ID of the currently selected task.
    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.task_id)
    }

    /// The task the open session belongs to, or the selected one.
    pub fn focused_task(&self) -> Option<&Task> {
        self.snapshot.session.as_ref().map_or_else(
            || self.selected_task(),
            |session| self.tasks.iter().find(|t| t.task_id == session.task_id),
        )
    }

    /// Move selection up. Returns whether it changed.
    pub fn select_previous(&mut self) -> bool {
        if self.selected > 0 {
            self.selected -= 1;
            return true;
        }
        false
    }

    /// Move selection down. Returns whether it changed.
    pub fn select_next(&mut self) -> bool {
        if !self.tasks.is_empty() && self.selected < self.tasks.len() - 1 {
            self.selected += 1;
            return true;
        }
        false
    }

    /// Fraction of the current half-cycle already elapsed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        let total = self.durations.seconds_for(self.snapshot.timer.mode);
        if total <= 0 {
            return 0.0;
        }
        (1.0 - self.snapshot.timer.remaining_seconds as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Whether the timer can be started from the current state.
    pub fn can_start(&self) -> bool {
        self.snapshot.status == Status::Inactive && self.selected_task().is_some()
    }

    /// `(completed, total)` objectives of the selected task.
    pub fn objective_progress(&self) -> (usize, usize) {
        let done = self.objectives.iter().filter(|o| o.completed).count();
        (done, self.objectives.len())
    }

    /// Append a notice to the log.
    pub fn push_notice(&mut self, notice: &Notice) {
        self.push_line(notice.message(), notice.is_error());
    }

    /// Append an error to the log.
    pub fn push_error(&mut self, text: impl Into<String>) {
        self.push_line(text.into(), true);
    }

    /// Append an informational line to the log.
    pub fn push_info(&mut self, text: impl Into<String>) {
        self.push_line(text.into(), false);
    }

    fn push_line(&mut self, text: String, is_error: bool) {
        if self.log.len() == NOTICE_LOG_LEN {
            self.log.pop_front();
        }
        self.log.push_back(LogLine { text, is_error });
    }

    /// Warning text for a session left open by an earlier run.
    pub fn stale_warning(&self) -> Option<String> {
        self.stale
            .as_ref()
            .map(|s| format!("{}. Press d to discard it.", describe_stale(s)))
    }
}
