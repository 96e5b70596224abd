//! Output formatting for focusdesk.
//!
//! This module provides formatters for displaying backend data in various formats.

mod json;
mod pretty;

use crate::api::{ActiveSession, FocusObjective, FocusStats, SessionRecord, Task, TaskId};
use crate::cli::args::OutputFormat;
use crate::error::FocusdeskError;
use crate::features::focus::FocusReport;

pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_tasks(
    tasks: &[Task],
    title: &str,
    format: OutputFormat,
) -> Result<String, FocusdeskError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, title)),
        OutputFormat::Json => format_tasks_json(tasks),
    }
}

/// Format focus statistics based on output format
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_stats(stats: &FocusStats, format: OutputFormat) -> Result<String, FocusdeskError> {
    match format {
        OutputFormat::Pretty => Ok(FocusReport::new(stats).format()),
        OutputFormat::Json => to_json(stats),
    }
}

/// Format session history based on output format
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_history(
    records: &[SessionRecord],
    days: u32,
    format: OutputFormat,
) -> Result<String, FocusdeskError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(records, days)),
        OutputFormat::Json => format_history_json(records, days),
    }
}

/// Format the open-session check based on output format
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_active(
    active: Option<&ActiveSession>,
    format: OutputFormat,
) -> Result<String, FocusdeskError> {
    match format {
        OutputFormat::Pretty => Ok(format_active_pretty(active)),
        OutputFormat::Json => format_active_json(active),
    }
}

/// Format a task's objectives based on output format
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_objectives(
    task_id: TaskId,
    objectives: &[FocusObjective],
    format: OutputFormat,
) -> Result<String, FocusdeskError> {
    match format {
        OutputFormat::Pretty => Ok(format_objectives_pretty(task_id, objectives)),
        OutputFormat::Json => format_objectives_json(task_id, objectives),
    }
}
