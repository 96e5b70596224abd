//! Focus statistics reports.
//!
//! Renders the backend's focus aggregates for the terminal.

use chrono::Duration;

use super::timer::format_duration;
use crate::api::types::FocusStats;

/// A renderable view of [`FocusStats`].
#[derive(Debug, Clone)]
pub struct FocusReport<'a> {
    stats: &'a FocusStats,
}

impl<'a> FocusReport<'a> {
    /// Wrap stats for display.
    #[must_use]
    pub const fn new(stats: &'a FocusStats) -> Self {
        Self { stats }
    }

    /// Compact one-liner for the timer's stats panel.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} in {} sessions, objectives {}/{} ({}%)",
            format_duration(Duration::minutes(self.stats.total_focus_minutes)),
            self.stats.total_sessions,
            self.stats.completed_objectives,
            self.stats.total_objectives,
            self.stats.objective_completion_rate
        )
    }

    /// Format the report for display.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn format(&self) -> String {
        let stats = self.stats;
        let mut lines = Vec::new();

        lines.push(format!("Focus Report: last {} days", stats.period_days));
        lines.push("═".repeat(50));
        lines.push(String::new());

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!(
            "  Total focus time:    {}",
            format_duration(Duration::minutes(stats.total_focus_minutes))
        ));
        lines.push(format!("  Sessions:            {}", stats.total_sessions));
        lines.push(format!(
            "  Average session:     {} minutes",
            stats.avg_session_duration
        ));
        lines.push(format!(
            "  Objectives done:     {}/{} ({}%)",
            stats.completed_objectives, stats.total_objectives, stats.objective_completion_rate
        ));
        lines.push(String::new());

        let max_day = stats
            .daily_distribution
            .iter()
            .map(|d| d.total_minutes)
            .fold(0.0_f64, f64::max);
        if max_day > 0.0 {
            lines.push("By Day of Week".to_string());
            lines.push("─".repeat(40));
            for day in &stats.daily_distribution {
                let bar_len = (day.total_minutes / max_day * 20.0) as usize;
                let name: String = day.day_name.chars().take(3).collect();
                lines.push(format!(
                    "  {name:<3} {:>5.0}m {}",
                    day.total_minutes,
                    "█".repeat(bar_len)
                ));
            }
            lines.push(String::new());
        }

        if !stats.top_focused_tasks.is_empty() {
            lines.push("Top Tasks".to_string());
            lines.push("─".repeat(40));
            for task in stats.top_focused_tasks.iter().take(5) {
                lines.push(format!(
                    "  {:<25} {:>5.0}m ({} sessions)",
                    truncate(&task.task_title, 25),
                    task.total_minutes,
                    task.session_count
                ));
            }
        }

        lines.join("\n").trim_end().to_string()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
