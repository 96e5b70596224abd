//! Configuration settings for focusdesk.
//!
//! Settings are loaded from `~/.focusdesk/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::FocusdeskError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Backend connection.
    pub server: ServerConfig,
    /// Focus timer settings.
    pub focus: FocusConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
}

/// Backend connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the task manager.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Login password. Prefer `FOCUSDESK_PASSWORD` over storing it here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Focus timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Focus half-cycle length in minutes.
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    /// Break half-cycle length in minutes.
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    /// Window for `focus stats` and the timer's stats panel.
    #[serde(default = "default_stats_days")]
    pub stats_days: u32,
    /// Window for `focus history`.
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. `warn`, `focusdesk=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

const fn default_focus_minutes() -> u32 {
    25
}

const fn default_break_minutes() -> u32 {
    5
}

const fn default_stats_days() -> u32 {
    30
}

const fn default_history_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: None,
            password: None,
            request_timeout_secs: None,
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
            stats_days: default_stats_days(),
            history_days: default_history_days(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, FocusdeskError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            FocusdeskError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            FocusdeskError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), FocusdeskError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| FocusdeskError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            FocusdeskError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
