//! Runs a [`FocusController`] on its own task.
//!
//! The driver owns the controller and multiplexes a one-second tick with a
//! command channel. Views send [`Command`]s, read [`Snapshot`]s from the
//! watch channel and show [`Notice`]s.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use super::controller::{FocusController, ResetOutcome, TickOutcome};
use super::session::Snapshot;
use super::timer::CycleDurations;
use crate::api::{FocusApi, SessionId, TaskId};

const TICK: Duration = Duration::from_secs(1);

/// Something a view asks the timer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Choose the task for the next start.
    SelectTask(Option<TaskId>),
    /// Open a session and start focusing.
    Start,
    /// Pause when running, resume when paused.
    TogglePause,
    /// Stop and discard the open session.
    Reset,
    /// Reset if needed, then stop the driver.
    Quit,
}

/// Something the timer wants the user to know.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A session was opened.
    Started {
        /// New session
        session_id: SessionId,
        /// Its task
        task_id: TaskId,
    },
    /// Countdown stopped.
    Paused,
    /// Countdown continued.
    Resumed,
    /// Focus finished and was recorded; the break is running.
    FocusCompleted {
        /// Duration recorded by the backend
        duration_minutes: f64,
    },
    /// Break finished.
    BreakCompleted,
    /// The open session was discarded.
    Discarded {
        /// The discarded session
        session_id: SessionId,
    },
    /// Timer reset with nothing to discard.
    Reset,
    /// An operation failed.
    Failed(String),
    /// The driver has exited.
    Stopped,
}

impl Notice {
    /// Text for the notice log.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Started {
                session_id,
                task_id,
            } => format!("Focus session {session_id} started for task {task_id}"),
            Self::Paused => "Timer paused".to_string(),
            Self::Resumed => "Timer resumed".to_string(),
            Self::FocusCompleted { duration_minutes } => {
                format!("Focus complete ({duration_minutes:.1} min recorded). Break time!")
            }
            Self::BreakCompleted => "Break over. Ready for the next focus session".to_string(),
            Self::Discarded { session_id } => format!("Session {session_id} discarded"),
            Self::Reset => "Timer reset".to_string(),
            Self::Failed(message) => message.clone(),
            Self::Stopped => "Timer stopped".to_string(),
        }
    }

    /// Whether this reports a failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Whether focus statistics changed server-side.
    #[must_use]
    pub const fn refreshes_stats(&self) -> bool {
        matches!(self, Self::FocusCompleted { .. } | Self::Discarded { .. })
    }
}

fn tick_notice(outcome: TickOutcome) -> Option<Notice> {
    match outcome {
        TickOutcome::Idle | TickOutcome::Suppressed | TickOutcome::Counting { .. } => None,
        TickOutcome::FocusCompleted {
            result: Ok(ended), ..
        } => Some(Notice::FocusCompleted {
            duration_minutes: ended.duration_minutes,
        }),
        TickOutcome::FocusCompleted { result: Err(e), .. } => Some(Notice::Failed(format!(
            "Could not end the focus session: {e}"
        ))),
        TickOutcome::BreakCompleted => Some(Notice::BreakCompleted),
    }
}

impl From<ResetOutcome> for Notice {
    fn from(outcome: ResetOutcome) -> Self {
        match outcome {
            ResetOutcome::NothingOpen => Self::Reset,
            ResetOutcome::Discarded(session) => Self::Discarded {
                session_id: session.session_id,
            },
            ResetOutcome::DiscardFailed { session, error } => Self::Failed(format!(
                "Could not discard session {}: {error}",
                session.session_id
            )),
        }
    }
}

fn ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Run `controller` until `Quit` arrives or every command sender is gone.
///
/// A session still open at that point is discarded, so a clean exit never
/// leaves one behind.
pub async fn drive<A: FocusApi + ?Sized>(
    controller: &mut FocusController<A>,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    notices: &mpsc::UnboundedSender<Notice>,
) {
    let mut ticker = ticker();
    // A closed notice channel only means nobody is watching
    let notify = |notice: Notice| {
        let _ = notices.send(notice);
    };

    loop {
        tokio::select! {
            _ = ticker.tick(), if controller.is_running() => {
                let outcome = controller.tick().await;
                if matches!(outcome, TickOutcome::FocusCompleted { .. }) {
                    // The break counts from when the end call resolved
                    ticker.reset();
                }
                if let Some(notice) = tick_notice(outcome) {
                    notify(notice);
                }
            }
            command = commands.recv() => {
                let Some(command) = command else { break };
                debug!(?command, "Timer command");
                match command {
                    Command::SelectTask(task_id) => controller.select_task(task_id),
                    Command::Start => match controller.start().await {
                        Ok(session) => {
                            ticker.reset();
                            notify(Notice::Started {
                                session_id: session.session_id,
                                task_id: session.task_id,
                            });
                        }
                        Err(e) => notify(Notice::Failed(format!("Could not start: {e}"))),
                    },
                    Command::TogglePause => {
                        let result = if controller.is_running() {
                            controller.pause().map(|()| Notice::Paused)
                        } else {
                            controller.resume().map(|()| {
                                ticker.reset();
                                Notice::Resumed
                            })
                        };
                        notify(result.unwrap_or_else(|e| Notice::Failed(e.to_string())));
                    }
                    Command::Reset => notify(controller.reset().await.into()),
                    Command::Quit => break,
                }
            }
        }
    }

    if controller.open_session().is_some() {
        notify(controller.reset().await.into());
    }
    notify(Notice::Stopped);
}

/// Channels to a spawned driver.
pub struct TimerHandle {
    /// Send commands here.
    pub commands: mpsc::UnboundedSender<Command>,
    /// Notices in the order they happened.
    pub notices: mpsc::UnboundedReceiver<Notice>,
    /// Latest controller state.
    pub snapshots: watch::Receiver<Snapshot>,
    /// Finishes after `Quit`.
    pub task: JoinHandle<()>,
}

/// Move `controller` onto a new task and return its channels.
pub fn spawn<A: FocusApi + ?Sized + 'static>(mut controller: FocusController<A>) -> TimerHandle {
    let (commands, mut command_rx) = mpsc::unbounded_channel();
    let (notice_tx, notices) = mpsc::unbounded_channel();
    let snapshots = controller.subscribe();
    let task = tokio::spawn(async move {
        drive(&mut controller, &mut command_rx, &notice_tx).await;
    });
    TimerHandle {
        commands,
        notices,
        snapshots,
        task,
    }
}

/// Build a controller for `task_id` and spawn it.
pub fn spawn_with<A: FocusApi + ?Sized + 'static>(
    api: Arc<A>,
    durations: CycleDurations,
    task_id: Option<TaskId>,
) -> TimerHandle {
    let mut controller = FocusController::new(api, durations);
    controller.select_task(task_id);
    spawn(controller)
}
