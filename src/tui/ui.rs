//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::features::focus::{FocusReport, Mode, Status};
use crate::tui::app::App;
use crate::tui::event::HELP;

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    // Header, body, notices, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    render_tasks(frame, app, body[0]);
    render_timer_panel(frame, app, body[1]);

    render_log(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn status_color(status: Status, mode: Mode) -> Color {
    match (status, mode) {
        (Status::Inactive, _) => Color::White,
        (Status::Paused, _) => Color::Yellow,
        (Status::Transitioning, _) => Color::Magenta,
        (Status::Active, Mode::Focus) => Color::Red,
        (Status::Active, Mode::Break) => Color::Green,
    }
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let task = app
        .focused_task()
        .map_or_else(|| "no task selected".to_string(), |t| t.label());
    let title = format!(" focusdesk · {task} ");

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

/// Render the task picker.
fn render_tasks(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items: Vec<ListItem<'_>> = app
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let is_selected = i == app.selected;
            let mut spans = vec![
                Span::styled(
                    format!("#{:<5}", task.task_id),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    task.title(),
                    Style::default().add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                ),
            ];

            if let Some(ref project) = task.project_name {
                spans.push(Span::styled(
                    format!("  [{project}]"),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Tasks ({}) ", app.tasks.len());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if !app.tasks.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render clock, progress, objectives and stats.
fn render_timer_panel(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    let snapshot = &app.snapshot;
    let color = status_color(snapshot.status, snapshot.timer.mode);

    let state_line = match snapshot.status {
        Status::Inactive if app.stale.is_some() => "Open session found".to_string(),
        Status::Inactive if app.can_start() => "Ready, press s to start".to_string(),
        Status::Inactive => "Select a task".to_string(),
        Status::Transitioning => "Saving session...".to_string(),
        status => format!("{} · {status}", snapshot.timer.mode),
    };
    let clock = Paragraph::new(vec![
        Line::from(Span::styled(
            snapshot.clock(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(state_line, Style::default().fg(color))),
    ])
    .alignment(ratatui::layout::Alignment::Center)
    .block(Block::default().title(" Timer ").borders(Borders::ALL));
    frame.render_widget(clock, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .ratio(app.progress());
    frame.render_widget(gauge, chunks[1]);

    let (done, total) = app.objective_progress();
    let objectives: Vec<ListItem<'_>> = app
        .objectives
        .iter()
        .enumerate()
        .map(|(i, o)| {
            let (icon, style) = if o.completed {
                (
                    "[x] ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("[ ] ", Style::default())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(icon),
                Span::styled(o.objective_text.as_str(), style),
            ]))
        })
        .collect();
    let objectives = List::new(objectives).block(
        Block::default()
            .title(format!(" Objectives {done}/{total} "))
            .borders(Borders::ALL),
    );
    frame.render_widget(objectives, chunks[2]);

    let stats_text = app.stats.as_ref().map_or_else(
        || "Stats unavailable".to_string(),
        |stats| FocusReport::new(stats).summary_line(),
    );
    let stats_title = app
        .stats
        .as_ref()
        .map_or_else(|| " Stats ".to_string(), |s| format!(" Last {} days ", s.period_days));
    let stats = Paragraph::new(stats_text)
        .block(Block::default().title(stats_title).borders(Borders::ALL));
    frame.render_widget(stats, chunks[3]);
}

/// Render the notice log, with the stale-session warning on top.
fn render_log(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if let Some(warning) = app.stale_warning() {
        lines.push(Line::from(Span::styled(
            warning,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }

    for line in &app.log {
        let style = if line.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(line.text.as_str(), style)));
    }

    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" Notices ").borders(Borders::ALL));
    frame.render_widget(log, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_text = app.status.as_deref().unwrap_or(HELP);

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ActiveSession, FocusObjective, Task};
    use chrono::NaiveDate;
    use crate::features::focus::{CycleDurations, Snapshot};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_idle_screen() {
        let tasks = vec![Task {
            task_id: 42,
            task_title: Some("Write copy".to_string()),
            project_name: Some("Launch".to_string()),
            status: None,
            due_date: None,
        }];
        let mut app = App::new(
            tasks,
            Some(42),
            CycleDurations::default(),
            Snapshot::idle(1500, Some(42)),
        );
        app.push_info("Connected");

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("25:00"));
        assert!(text.contains("Write copy"));
        assert!(text.contains("Ready"));
        assert!(text.contains("Connected"));
        assert!(text.contains("Objectives 0/0"));
    }

    #[test]
    fn test_render_stale_prompt_and_objectives() {
        let mut app = App::new(
            vec![],
            None,
            CycleDurations::default(),
            Snapshot::idle(1500, None),
        );
        app.stale = Some(ActiveSession {
            session_id: 11,
            task_id: Some(42),
            start_time: NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        });
        app.objectives = vec![FocusObjective {
            objective_id: 5,
            task_id: 42,
            objective_text: "Outline".to_string(),
            completed: true,
        }];

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Press d to discard it"));
        assert!(text.contains("Open session found"));
        assert!(text.contains("Objectives 1/1"));
        assert!(text.contains("Outline"));
    }
}
