//! Error types for focusdesk.

use thiserror::Error;

/// Errors produced by focusdesk operations.
///
/// Every failure is scoped to the single operation that raised it; nothing
/// here is fatal to the process and nothing is retried automatically.
#[derive(Error, Debug)]
pub enum FocusdeskError {
    /// The user has to supply something before the operation can run
    /// (e.g. no task selected, empty objective text).
    #[error("{0}")]
    UserInput(String),

    /// No usable HTTP response: unreachable, timed out or undecodable.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    ServerRejection {
        /// HTTP status code.
        status: u16,
        /// Error message from the `{error}` body, verbatim.
        message: String,
    },

    /// The requested transition is not valid from the current timer state.
    #[error("{0}")]
    InvalidState(String),

    /// A referenced item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be encoded or decoded.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FocusdeskError {
    /// Shorthand for a rejection with a status and message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ServerRejection {
            status,
            message: message.into(),
        }
    }

    /// Whether the request failed before reaching the backend.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Whether the backend refused the request.
    #[must_use]
    pub const fn is_server_rejection(&self) -> bool {
        matches!(self, Self::ServerRejection { .. })
    }

    /// Whether the backend reported that the caller is not logged in.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::ServerRejection { status: 401, .. })
    }
}

impl From<reqwest::Error> for FocusdeskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Network(format!("unreadable response body: {err}"));
        }
        if err.is_timeout() {
            return Self::Network(format!("request timed out: {err}"));
        }
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_displays_message_verbatim() {
        let err = FocusdeskError::rejected(404, "task not found");
        assert_eq!(err.to_string(), "task not found");
        assert!(err.is_server_rejection());
        assert!(!err.is_network());
    }

    #[test]
    fn test_unauthorized() {
        assert!(FocusdeskError::rejected(401, "No autenticado").is_unauthorized());
        assert!(!FocusdeskError::rejected(400, "bad").is_unauthorized());
        assert!(!FocusdeskError::Network("refused".to_string()).is_unauthorized());
    }

    #[test]
    fn test_user_input_display() {
        let err = FocusdeskError::UserInput("Select a task first".to_string());
        assert_eq!(err.to_string(), "Select a task first");
    }
}
