//! focusdesk - Pomodoro focus sessions for the task manager backend
//!
//! A countdown timer whose focus intervals are recorded as server-side
//! focus sessions, with objectives, statistics and history from the same
//! REST backend. The timer runs in a full-screen TUI or headless.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod tui;

pub use api::BackendClient;
pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::FocusdeskError;
