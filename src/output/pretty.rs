use chrono::Local;
use colored::Colorize;

use crate::api::{ActiveSession, EndedSession, FocusObjective, SessionRecord, Task, TaskId};
use crate::features::focus::session::describe_stale;
use crate::features::focus::timer::format_duration;

/// Format a list of tasks as a pretty table
pub fn format_tasks_pretty(tasks: &[Task], title: &str) -> String {
    if tasks.is_empty() {
        return format!("{title} (0 items)\n  No tasks");
    }

    let mut output = format!("{} ({} items)\n", title, tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let icon = if task.is_pending() {
            "[ ]".white()
        } else {
            "[x]".green()
        };

        let mut line = format!(
            "{} {} {}",
            icon,
            format!("#{:<5}", task.task_id).dimmed(),
            task.title().bold()
        );

        if let Some(project) = &task.project_name {
            line.push_str(&format!("  {}", project.dimmed()));
        }

        if let Some(due) = &task.due_date {
            line.push_str(&format!("  {}", due.yellow()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format finished sessions
pub fn format_history_pretty(records: &[SessionRecord], days: u32) -> String {
    let title = format!("Focus sessions, last {days} days");
    if records.is_empty() {
        return format!("{title}\n  No sessions");
    }

    let mut output = format!("{} ({})\n", title, records.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for record in records {
        let task = record.task_title.as_deref().unwrap_or("(no task)");
        let duration = record.duration_seconds.map_or_else(
            || "open".yellow().to_string(),
            |secs| format_duration(chrono::Duration::seconds(secs)),
        );
        output.push_str(&format!(
            "  {}  {}  {}\n",
            record.start_time.dimmed(),
            task.bold(),
            duration
        ));
    }

    output
}

/// Format the result of the open-session check
pub fn format_active_pretty(active: Option<&ActiveSession>) -> String {
    match active {
        None => format!("{} No focus session is open", "✓".green()),
        Some(session) => format!(
            "{} {}\n  Run 'focusdesk focus discard' to drop it or 'focusdesk focus end' to record it.",
            "!".yellow().bold(),
            describe_stale(session)
        ),
    }
}

/// Format a finished session
pub fn format_ended_pretty(ended: &EndedSession) -> String {
    let session = ended
        .session_id
        .map_or_else(String::new, |id| format!(" {id}"));
    format!(
        "{} Focus session{} recorded ({:.1} minutes)",
        "✓".green(),
        session,
        ended.duration_minutes
    )
}

/// Format a discarded session
pub fn format_discarded_pretty(active: &ActiveSession) -> String {
    let started = active.start_time.format("%H:%M");
    format!(
        "{} Discarded session {} (opened at {started}, not recorded)",
        "✓".green(),
        active.session_id
    )
}

/// Format a task's objectives with progress
pub fn format_objectives_pretty(task_id: TaskId, objectives: &[FocusObjective]) -> String {
    let done = objectives.iter().filter(|o| o.completed).count();
    let mut output = format!(
        "Objectives for task {} ({}/{} done)\n",
        task_id,
        done,
        objectives.len()
    );
    output.push_str(&"─".repeat(40));
    output.push('\n');

    if objectives.is_empty() {
        output.push_str("  No objectives\n");
        return output;
    }

    for objective in objectives {
        output.push_str(&format_objective_line(objective));
        output.push('\n');
    }
    output
}

/// One objective as a checklist line
pub fn format_objective_line(objective: &FocusObjective) -> String {
    let (icon, text) = if objective.completed {
        (
            "[x]".green(),
            objective.objective_text.strikethrough().dimmed(),
        )
    } else {
        ("[ ]".white(), objective.objective_text.normal())
    };
    format!(
        "  {} {} {}",
        icon,
        format!("#{}", objective.objective_id).dimmed(),
        text
    )
}

/// Short confirmation line
pub fn format_done(message: &str) -> String {
    format!("{} {message}", "✓".green())
}

/// Current local time, for headless notices
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
