//! Focus mode command implementation.
//!
//! Runs the timer (full-screen or headless) and handles the one-shot
//! session, stats and history commands.

use std::sync::Arc;

use chrono::Duration;
use colored::Colorize;
use tracing::{info, warn};

use super::Context;
use crate::api::{ActiveSession, BackendClient, TaskId};
use crate::cli::args::{FocusCommands, OutputFormat};
use crate::config::FocusConfig;
use crate::error::FocusdeskError;
use crate::features::focus::session::describe_stale;
use crate::features::focus::timer::render_progress_bar;
use crate::features::focus::{
    driver, parse_duration, reconcile, Command, CycleDurations, FocusController, Mode, Notice,
    Snapshot, Status,
};
use crate::output::{
    format_active, format_discarded_pretty, format_ended_pretty, format_history, format_stats,
    timestamp, to_json,
};

/// Execute focus subcommands.
///
/// # Errors
///
/// Returns an error if arguments are invalid, a backend call fails, or
/// output formatting fails.
pub async fn focus(ctx: &Context, cmd: FocusCommands) -> Result<String, FocusdeskError> {
    match cmd {
        FocusCommands::Run {
            task,
            focus,
            rest,
            headless,
            discard_stale,
        } => {
            let durations =
                resolve_durations(&ctx.config.focus, focus.as_deref(), rest.as_deref())?;
            if headless {
                let task_id = task.ok_or_else(|| {
                    FocusdeskError::UserInput(
                        "--task is required with --headless (see 'focusdesk tasks')".to_string(),
                    )
                })?;
                let client = ctx.connect().await?;
                check_stale(&client, discard_stale, true).await?;
                run_headless(client, durations, task_id).await
            } else {
                let client = ctx.connect().await?;
                let stale = check_stale(&client, discard_stale, false).await?;
                crate::tui::run(client, durations, task, ctx.config.focus.stats_days, stale)
                    .await?;
                Ok(String::new())
            }
        }
        FocusCommands::Status => {
            let client = ctx.connect().await?;
            let stale = reconcile::find_stale(client.as_ref()).await?;
            format_active(stale.as_ref(), ctx.format)
        }
        FocusCommands::Discard => {
            let client = ctx.connect().await?;
            let stale = reconcile::discard_stale(client.as_ref()).await?;
            match ctx.format {
                OutputFormat::Pretty => Ok(format_discarded_pretty(&stale)),
                OutputFormat::Json => to_json(&stale),
            }
        }
        FocusCommands::End => {
            let client = ctx.connect().await?;
            let ended = reconcile::end_stale(client.as_ref()).await?;
            match ctx.format {
                OutputFormat::Pretty => Ok(format_ended_pretty(&ended)),
                OutputFormat::Json => to_json(&ended),
            }
        }
        FocusCommands::Stats { days } => {
            let days = days.unwrap_or(ctx.config.focus.stats_days);
            let client = ctx.connect().await?;
            let stats = client.focus_stats(days).await?;
            format_stats(&stats, ctx.format)
        }
        FocusCommands::History { days } => {
            let days = days.unwrap_or(ctx.config.focus.history_days);
            let client = ctx.connect().await?;
            let records = client.session_history(days).await?;
            format_history(&records, days, ctx.format)
        }
    }
}

/// Cycle lengths from `--focus`/`--break`, falling back to the config.
fn resolve_durations(
    config: &FocusConfig,
    focus: Option<&str>,
    rest: Option<&str>,
) -> Result<CycleDurations, FocusdeskError> {
    let base = CycleDurations::from_config(config)?;
    let length = |value: Option<&str>, mode: Mode| -> Result<Duration, FocusdeskError> {
        match value {
            None => Ok(Duration::seconds(base.seconds_for(mode))),
            Some(s) => parse_duration(s).ok_or_else(|| {
                FocusdeskError::UserInput(format!(
                    "Invalid {} duration: '{s}'. Use e.g. 25m, 1h30m, 90s",
                    mode.display_name().to_lowercase()
                ))
            }),
        }
    };
    CycleDurations::new(length(focus, Mode::Focus)?, length(rest, Mode::Break)?)
}

/// Look for a session left open by an earlier run.
///
/// With `discard` it is dropped. Headless runs cannot prompt, so they fail
/// instead; the TUI gets the session back to show a prompt.
async fn check_stale(
    client: &BackendClient,
    discard: bool,
    headless: bool,
) -> Result<Option<ActiveSession>, FocusdeskError> {
    let Some(stale) = reconcile::find_stale(client).await? else {
        return Ok(None);
    };

    if discard {
        let discarded = reconcile::discard_stale(client).await?;
        println!("{}", format_discarded_pretty(&discarded));
        return Ok(None);
    }

    if headless {
        return Err(FocusdeskError::UserInput(format!(
            "{}. Pass --discard-stale or run 'focusdesk focus discard' first",
            describe_stale(&stale)
        )));
    }

    Ok(Some(stale))
}

/// One focus cycle on `task_id`, printing notices until the break ends.
///
/// Ctrl-C resets the timer, discarding the open session.
async fn run_headless(
    client: Arc<BackendClient>,
    durations: CycleDurations,
    task_id: TaskId,
) -> Result<String, FocusdeskError> {
    let mut controller = FocusController::new(client, durations);
    controller.select_task(Some(task_id));
    let session = controller.start().await?;
    print_notice(&Notice::Started {
        session_id: session.session_id,
        task_id: session.task_id,
    });

    let mut handle = driver::spawn(controller);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    loop {
        tokio::select! {
            notice = handle.notices.recv() => {
                let Some(notice) = notice else { break };
                if notice == Notice::Stopped {
                    break;
                }
                print_notice(&notice);
                let failed_out = notice.is_error()
                    && handle.snapshots.borrow().status == Status::Inactive;
                if notice == Notice::BreakCompleted || failed_out {
                    let _ = handle.commands.send(Command::Quit);
                }
            }
            changed = handle.snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = handle.snapshots.borrow_and_update().clone();
                if let Some(line) = progress_line(&snapshot, &durations) {
                    println!("[{}] {line}", timestamp());
                }
            }
            signal = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                match signal {
                    Ok(()) => {
                        info!("Interrupted, resetting timer");
                        let _ = handle.commands.send(Command::Quit);
                    }
                    Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
                }
            }
        }
    }

    if let Err(e) = handle.task.await {
        warn!(error = %e, "Timer task ended abnormally");
    }
    Ok(String::new())
}

/// A once-a-minute progress line while the countdown runs.
#[allow(clippy::cast_precision_loss)]
fn progress_line(snapshot: &Snapshot, durations: &CycleDurations) -> Option<String> {
    let remaining = snapshot.timer.remaining_seconds;
    if snapshot.status != Status::Active || remaining <= 0 || remaining % 60 != 0 {
        return None;
    }
    let total = durations.seconds_for(snapshot.timer.mode);
    let elapsed = 1.0 - remaining as f64 / total as f64;
    Some(format!(
        "{} {} remaining {}",
        snapshot.timer.mode,
        snapshot.clock(),
        render_progress_bar(elapsed, 20)
    ))
}

fn print_notice(notice: &Notice) {
    let line = format!("[{}] {}", timestamp(), notice.message());
    if notice.is_error() {
        eprintln!("{}", line.red());
    } else {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Paths};
    use crate::features::focus::TimerState;
    use std::path::PathBuf;

    #[test]
    fn test_durations_default_to_config() {
        let mut config = FocusConfig::default();
        config.focus_minutes = 50;
        config.break_minutes = 10;

        let durations = resolve_durations(&config, None, None).unwrap();
        assert_eq!(durations.seconds_for(Mode::Focus), 3000);
        assert_eq!(durations.seconds_for(Mode::Break), 600);
    }

    #[test]
    fn test_durations_from_flags() {
        let durations =
            resolve_durations(&FocusConfig::default(), Some("1h30m"), Some("90s")).unwrap();
        assert_eq!(durations.seconds_for(Mode::Focus), 5400);
        assert_eq!(durations.seconds_for(Mode::Break), 90);
    }

    #[test]
    fn test_durations_reject_garbage() {
        let err = resolve_durations(&FocusConfig::default(), Some("soon"), None).unwrap_err();
        assert!(matches!(err, FocusdeskError::UserInput(_)));
        assert!(err.to_string().contains("focus duration"));

        let err = resolve_durations(&FocusConfig::default(), None, Some("0")).unwrap_err();
        assert!(matches!(err, FocusdeskError::UserInput(_)));
    }

    #[test]
    fn test_durations_reject_oversized_values() {
        let err = resolve_durations(&FocusConfig::default(), Some("99999999999999999"), None)
            .unwrap_err();
        assert!(matches!(err, FocusdeskError::UserInput(_)));
        assert!(err.to_string().contains("Invalid focus duration"));

        let err = resolve_durations(&FocusConfig::default(), None, Some("9999999999999999h"))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid break duration"));
    }

    #[test]
    fn test_progress_line_on_whole_minutes() {
        let durations =
            CycleDurations::new(Duration::minutes(25), Duration::minutes(4)).unwrap();
        let mut snapshot = Snapshot::idle(1500, Some(42));
        assert_eq!(progress_line(&snapshot, &durations), None);

        snapshot.status = Status::Active;
        snapshot.timer = TimerState {
            mode: Mode::Break,
            remaining_seconds: 120,
            paused: false,
        };
        let line = progress_line(&snapshot, &durations).unwrap();
        assert!(line.starts_with("Break 02:00 remaining ["));
        assert_eq!(line.matches('█').count(), 10);

        snapshot.timer.remaining_seconds = 119;
        assert_eq!(progress_line(&snapshot, &durations), None);
    }

    #[tokio::test]
    async fn test_headless_requires_task() {
        let ctx = Context {
            config: Config::default(),
            paths: Paths::with_root(PathBuf::from("/tmp/fd")),
            format: OutputFormat::Pretty,
        };
        let err = focus(
            &ctx,
            FocusCommands::Run {
                task: None,
                focus: None,
                rest: None,
                headless: true,
                discard_stale: false,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FocusdeskError::UserInput(_)));
        assert!(err.to_string().contains("--task"));
    }
}
