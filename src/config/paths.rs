//! Path resolution for focusdesk configuration and log files.
//!
//! All focusdesk files live in `~/.focusdesk/` unless `FOCUSDESK_HOME` points
//! elsewhere:
//! - `config.yaml` - Main configuration file
//! - `focusdesk.log` - Log output while the full-screen timer is open

use std::path::PathBuf;

use crate::error::FocusdeskError;

/// Environment variable overriding the root directory.
pub const HOME_ENV: &str = "FOCUSDESK_HOME";

/// Paths to focusdesk files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.focusdesk/`
    pub root: PathBuf,
    /// Config file: `~/.focusdesk/config.yaml`
    pub config_file: PathBuf,
    /// Log file: `~/.focusdesk/focusdesk.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolve paths from `FOCUSDESK_HOME` or the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, FocusdeskError> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            FocusdeskError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".focusdesk")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            log_file: root.join("focusdesk.log"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), FocusdeskError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                FocusdeskError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".focusdesk")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-focusdesk");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.log_file, root.join("focusdesk.log"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
    }
}
