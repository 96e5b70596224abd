//! Event handling for the TUI.
//!
//! Terminal input is read on a plain thread (crossterm's reader blocks) and
//! forwarded to the async loop over a channel.

use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::warn;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start a focus session on the selected task.
    Start,
    /// Pause or resume the countdown.
    TogglePause,
    /// Reset the timer, discarding the open session.
    Reset,
    /// Select the next task.
    Next,
    /// Select the previous task.
    Previous,
    /// Discard a session left open by an earlier run.
    DiscardStale,
    /// Flip completion of the n-th objective (zero-based).
    ToggleObjective(usize),
    /// Show key help.
    Help,
}

/// Map a key press to an action.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('s') | KeyCode::Enter => Some(Action::Start),
        KeyCode::Char('p' | ' ') => Some(Action::TogglePause),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Next),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Previous),
        KeyCode::Char('d') => Some(Action::DiscardStale),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|n| Action::ToggleObjective(n as usize - 1)),
        KeyCode::Char('?') => Some(Action::Help),
        _ => None,
    }
}

/// Key help for the status bar.
pub const HELP: &str =
    "s:start | p:pause/resume | r:reset | j/k:task | 1-9:objective | d:discard stale | q:quit";

/// Spawn the input thread. It stops once the receiver is dropped.
pub fn spawn_input_reader() -> mpsc::UnboundedReceiver<KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "Event read failed");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    warn!(error = %e, "Event poll failed");
                    break;
                }
            }
        }
    });
    rx
}
