//! Full-screen focus timer.
//!
//! The timer itself runs on the driver task; this loop only draws
//! snapshots, forwards keys as commands and shows notices. Built with
//! ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;
use std::sync::Arc;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{debug, info, warn};

use crate::api::{ActiveSession, BackendClient, TaskId};
use crate::error::FocusdeskError;
use crate::features::focus::driver::{self, Command, Notice, TimerHandle};
use crate::features::focus::{reconcile, CycleDurations, Mode, Snapshot};
use crate::features::objectives::ObjectiveBoard;
use event::Action;

/// Backend handles and settings shared by the event loop.
struct Session {
    client: Arc<BackendClient>,
    board: ObjectiveBoard<BackendClient>,
    stats_days: u32,
}

impl Session {
    async fn refresh_stats(&self, app: &mut App) {
        match self.client.focus_stats(self.stats_days).await {
            Ok(stats) => app.stats = Some(stats),
            Err(e) => {
                warn!(error = %e, "Could not refresh focus stats");
                app.push_error(format!("Could not load stats: {e}"));
            }
        }
    }

    async fn load_objectives(&mut self, app: &mut App) {
        let Some(task_id) = app.selected_task_id() else {
            app.objectives.clear();
            return;
        };
        match self.board.load(task_id).await {
            Ok(objectives) => app.objectives = objectives.to_vec(),
            Err(e) => {
                app.objectives.clear();
                app.push_error(format!("Could not load objectives: {e}"));
            }
        }
    }

    async fn toggle_objective(&mut self, app: &mut App, index: usize) {
        let (Some(task_id), Some(objective)) = (app.selected_task_id(), app.objectives.get(index))
        else {
            return;
        };
        let objective_id = objective.objective_id;
        match self.board.toggle(objective_id).await {
            Ok(_) => {
                if let Some(cached) = self.board.cached(task_id) {
                    app.objectives = cached.to_vec();
                }
                let (done, total) = self.board.progress(task_id);
                app.push_info(format!("Objectives {done}/{total} done"));
            }
            Err(e) => app.push_error(format!("Could not update objective: {e}")),
        }
    }

    async fn discard_stale(&self, app: &mut App) {
        match reconcile::discard_stale(self.client.as_ref()).await {
            Ok(stale) => {
                app.stale = None;
                app.push_info(format!("Session {} discarded", stale.session_id));
                self.refresh_stats(app).await;
            }
            Err(FocusdeskError::NotFound(_)) => {
                app.stale = None;
                app.push_info("No open session to discard");
            }
            Err(e) => app.push_error(format!("Could not discard: {e}")),
        }
    }
}

/// Run the TUI until the user quits.
///
/// `stale` is a session left open by an earlier run; it is shown with a
/// prompt to discard it.
///
/// # Errors
///
/// Returns an error if the task list cannot be fetched or the terminal
/// cannot be set up.
pub async fn run(
    client: Arc<BackendClient>,
    durations: CycleDurations,
    task: Option<TaskId>,
    stats_days: u32,
    stale: Option<ActiveSession>,
) -> Result<(), FocusdeskError> {
    let tasks = client.pending_tasks().await?;
    info!(count = tasks.len(), "Loaded tasks");

    let idle = Snapshot::idle(durations.seconds_for(Mode::Focus), task);
    let mut app = App::new(tasks, task, durations, idle);
    app.stale = stale;

    let mut session = Session {
        board: ObjectiveBoard::new(Arc::clone(&client)),
        client,
        stats_days,
    };
    session.refresh_stats(&mut app).await;
    session.load_objectives(&mut app).await;

    let mut handle = driver::spawn_with(
        Arc::clone(&session.client),
        durations,
        app.selected_task_id(),
    );
    app.snapshot = handle.snapshots.borrow_and_update().clone();

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| FocusdeskError::Config(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| FocusdeskError::Config(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| FocusdeskError::Config(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, &mut app, &mut session, &mut handle).await;

    // Restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    // Make sure the driver had its chance to discard
    if result.is_err() {
        let _ = handle.commands.send(Command::Quit);
    }
    if let Err(e) = handle.task.await {
        warn!(error = %e, "Timer task ended abnormally");
    }

    result
}

/// Run the main application loop.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    session: &mut Session,
    handle: &mut TimerHandle,
) -> Result<(), FocusdeskError> {
    let mut keys = event::spawn_input_reader();
    let mut quitting = false;

    loop {
        // Draw UI
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            key = keys.recv(), if !quitting => {
                let Some(key) = key else {
                    quitting = request_quit(handle);
                    continue;
                };
                let Some(action) = event::action_for(key) else { continue };
                debug!(?action, "Key action");
                match action {
                    Action::Quit => quitting = request_quit(handle),
                    Action::Start => {
                        app.status = None;
                        send(handle, Command::Start, app);
                    }
                    Action::TogglePause => send(handle, Command::TogglePause, app),
                    Action::Reset => send(handle, Command::Reset, app),
                    Action::Next | Action::Previous => {
                        let moved = if action == Action::Next {
                            app.select_next()
                        } else {
                            app.select_previous()
                        };
                        if moved {
                            send(handle, Command::SelectTask(app.selected_task_id()), app);
                            session.load_objectives(app).await;
                        }
                    }
                    Action::DiscardStale => session.discard_stale(app).await,
                    Action::ToggleObjective(index) => session.toggle_objective(app, index).await,
                    Action::Help => app.status = None,
                }
            }
            notice = handle.notices.recv() => {
                match notice {
                    Some(Notice::Stopped) | None => break,
                    Some(notice) => {
                        app.push_notice(&notice);
                        if notice.refreshes_stats() {
                            session.refresh_stats(app).await;
                        }
                    }
                }
            }
            changed = handle.snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                app.snapshot = handle.snapshots.borrow_and_update().clone();
            }
        }
    }

    Ok(())
}

/// Ask the driver to stop; the loop keeps drawing until it reports `Stopped`.
fn request_quit(handle: &TimerHandle) -> bool {
    // Already gone when the driver exited on its own
    let _ = handle.commands.send(Command::Quit);
    true
}

fn send(handle: &TimerHandle, command: Command, app: &mut App) {
    if handle.commands.send(command).is_err() {
        app.push_error("Timer is not running");
    }
}
