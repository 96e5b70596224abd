//! Configuration management for focusdesk.
//!
//! This module handles loading and saving configuration from `~/.focusdesk/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{Config, FocusConfig, GeneralConfig, LogConfig, ServerConfig};
