//! Tracing subscriber setup.
//!
//! Line commands log to stderr. The full-screen timer owns the terminal, so
//! while it runs logs go to `~/.focusdesk/focusdesk.log` instead.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::FocusdeskError;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error.
    Stderr,
    /// Appended to a file.
    File(PathBuf),
}

/// Filter directive for a `-v` count, falling back to the configured level.
#[must_use]
pub fn verbosity_directive(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "focusdesk=info".to_string(),
        2 => "focusdesk=debug".to_string(),
        _ => "focusdesk=trace,reqwest=debug".to_string(),
    }
}

fn build_filter(verbosity: u8, configured: &str) -> Result<EnvFilter, FocusdeskError> {
    // An explicit -v beats RUST_LOG, which beats the config file
    if verbosity == 0 {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
    }
    parse_filter(&verbosity_directive(verbosity, configured))
}

fn parse_filter(directive: &str) -> Result<EnvFilter, FocusdeskError> {
    EnvFilter::try_new(directive)
        .map_err(|e| FocusdeskError::Config(format!("Invalid log level '{directive}': {e}")))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns `Config` for an unparsable level or when a subscriber is already
/// installed, and `Io` if the log file cannot be opened.
pub fn init(verbosity: u8, configured: &str, target: LogTarget) -> Result<(), FocusdeskError> {
    let filter = build_filter(verbosity, configured)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    result.map_err(|e| FocusdeskError::Config(format!("Failed to initialize logging: {e}")))
}
