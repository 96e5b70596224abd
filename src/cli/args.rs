use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::api::{ObjectiveId, TaskId};

#[derive(Parser)]
#[command(name = "focusdesk")]
#[command(about = "Pomodoro focus sessions for your task manager, from the terminal")]
#[command(long_about = "focusdesk - focus sessions for the task manager backend

Runs a Pomodoro timer bound to the backend's focus sessions: a focus
interval opens a session for a task, finishing it records the time, and
resetting discards it. Objectives, statistics and history come from the
same backend.

QUICK START:
  focusdesk tasks                    List tasks you can focus on
  focusdesk focus run --task 42      Full-screen timer for task 42
  focusdesk focus run --headless     Line-by-line timer for scripts
  focusdesk focus stats              Focus report for the last 30 days

CONNECTION:
  --url / FOCUSDESK_URL              Backend base URL
  FOCUSDESK_EMAIL, FOCUSDESK_PASSWORD  Login credentials

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  focusdesk <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend base URL (overrides `server.base_url`)
    #[arg(long, env = "FOCUSDESK_URL", global = true)]
    pub url: Option<String>,

    /// Login email (overrides `server.email`)
    #[arg(long, env = "FOCUSDESK_EMAIL", global = true, hide_env_values = true)]
    pub email: Option<String>,

    /// Login password
    #[arg(long, env = "FOCUSDESK_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks
    ///
    /// Shows the tasks you can focus on. Finished tasks are hidden
    /// unless --all is given.
    ///
    /// # Examples
    ///
    ///   focusdesk tasks              Pending tasks
    ///   focusdesk tasks --all        Include finished tasks
    ///   focusdesk tasks -o json      Output as JSON
    #[command(alias = "t")]
    Tasks {
        /// Include finished tasks
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Focus timer and session tracking
    ///
    /// # Subcommands
    ///
    ///   run      Run the Pomodoro timer
    ///   status   Check for an open session
    ///   discard  Drop an open session without recording it
    ///   end      Record an open session as focus time
    ///   stats    Focus report
    ///   history  Finished sessions
    ///
    /// # Examples
    ///
    ///   focusdesk focus run --task 42              25/5 Pomodoro on task 42
    ///   focusdesk focus run --focus 50m --break 10m
    ///   focusdesk focus status
    ///   focusdesk focus stats --days 7
    #[command(alias = "f")]
    Focus(FocusArgs),

    /// Focus objectives of a task
    ///
    /// A checklist of what to get done during focus sessions on a task.
    ///
    /// # Examples
    ///
    ///   focusdesk objective list 42
    ///   focusdesk objective add 42 "Outline the intro"
    ///   focusdesk objective done 7
    ///   focusdesk objective done 7 --undo
    #[command(alias = "o")]
    Objective(ObjectiveArgs),

    /// Inspect or create the config file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   focusdesk completions bash > ~/.local/share/bash-completion/completions/focusdesk
    ///   focusdesk completions zsh > ~/.zfunc/_focusdesk
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for focus mode.
#[derive(Args)]
pub struct FocusArgs {
    #[command(subcommand)]
    pub command: FocusCommands,
}

/// Focus mode subcommands.
#[derive(Subcommand)]
pub enum FocusCommands {
    /// Run the Pomodoro timer
    ///
    /// Opens the full-screen timer unless --headless is given. The
    /// countdown is local; the backend records a session for every
    /// focus interval that runs to the end.
    ///
    /// Examples:
    ///   focusdesk focus run
    ///   focusdesk focus run --task 42
    ///   focusdesk focus run --task 42 --headless --discard-stale
    Run {
        /// Task to focus on (required with --headless)
        #[arg(long, short = 't')]
        task: Option<TaskId>,

        /// Focus length (e.g., 25m, 1h, 50)
        #[arg(long = "focus", short = 'f')]
        focus: Option<String>,

        /// Break length (e.g., 5m, 10)
        #[arg(long = "break", short = 'b')]
        rest: Option<String>,

        /// Print notices line by line instead of the full-screen timer
        #[arg(long)]
        headless: bool,

        /// Discard a session left open by an earlier run before starting
        #[arg(long)]
        discard_stale: bool,
    },

    /// Check for an open session
    Status,

    /// Drop the open session without recording it
    Discard,

    /// Record the open session as focus time
    End,

    /// Focus statistics report
    Stats {
        /// Number of days to include (defaults to `focus.stats_days`)
        #[arg(long, short = 'd')]
        days: Option<u32>,
    },

    /// Finished focus sessions
    History {
        /// Number of days to include (defaults to `focus.history_days`)
        #[arg(long, short = 'd')]
        days: Option<u32>,
    },
}

/// Arguments for objectives.
#[derive(Args)]
pub struct ObjectiveArgs {
    #[command(subcommand)]
    pub command: ObjectiveCommands,
}

/// Objective subcommands.
#[derive(Subcommand)]
pub enum ObjectiveCommands {
    /// List a task's objectives
    #[command(alias = "ls")]
    List {
        /// Task ID
        task: TaskId,
    },

    /// Add an objective to a task
    Add {
        /// Task ID
        task: TaskId,
        /// What to get done
        text: String,
    },

    /// Mark an objective done
    Done {
        /// Objective ID
        id: ObjectiveId,
        /// Mark as not done instead
        #[arg(long)]
        undo: bool,
    },

    /// Change an objective's text
    Edit {
        /// Objective ID
        id: ObjectiveId,
        /// New text
        text: String,
    },

    /// Delete an objective
    #[command(alias = "rm")]
    Delete {
        /// Objective ID
        id: ObjectiveId,
    },
}

/// Arguments for config management.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}
