//! Focus mode.
//!
//! A Pomodoro timer tied to the backend's focus sessions:
//! - [`FocusController`] owns the countdown and the open session
//! - [`driver`] runs it against a one-second tick and a command channel
//! - [`reconcile`] deals with sessions left open by an earlier run
//! - [`FocusReport`] renders focus statistics

pub mod controller;
pub mod driver;
pub mod reconcile;
pub mod report;
pub mod session;
pub mod timer;

pub use controller::{FocusController, ResetOutcome, TickOutcome};
pub use driver::{Command, Notice, TimerHandle};
pub use report::FocusReport;
pub use session::{OpenSession, Snapshot, Status};
pub use timer::{format_duration, parse_duration, CycleDurations, Mode, TimerState};
