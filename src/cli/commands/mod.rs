//! Command implementations for focusdesk.
//!
//! Every command returns the text to print; `main` prints it.

mod config;
mod focus;
mod objectives;
mod tasks;

pub use config::config;
pub use focus::focus;
pub use objectives::objective;
pub use tasks::tasks;

use std::sync::Arc;

use tracing::debug;

use crate::api::{BackendClient, Credentials};
use crate::cli::args::{Cli, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::FocusdeskError;

/// Settings for one invocation: the config file with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration.
    pub config: Config,
    /// Where config and log files live.
    pub paths: Paths,
    /// Output format for results.
    pub format: OutputFormat,
}

impl Context {
    /// Load the config file and apply `--url`, `--email`, `--password` and `--output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn resolve(cli: &Cli) -> Result<Self, FocusdeskError> {
        let paths = Paths::new()?;
        let config = Config::load_from_path(&paths.config_file)?;
        Ok(Self::with_overrides(config, paths, cli))
    }

    /// Apply command-line overrides to an already loaded config.
    #[must_use]
    pub fn with_overrides(mut config: Config, paths: Paths, cli: &Cli) -> Self {
        if let Some(url) = &cli.url {
            config.server.base_url.clone_from(url);
        }
        if let Some(email) = &cli.email {
            config.server.email = Some(email.clone());
        }
        if let Some(password) = &cli.password {
            config.server.password = Some(password.clone());
        }
        let format = cli.output.unwrap_or(config.general.default_output);
        Self {
            config,
            paths,
            format,
        }
    }

    /// Build a client and log in when credentials are configured.
    ///
    /// # Errors
    ///
    /// - `UserInput` if an email is configured without a password
    /// - whatever the login request failed with
    pub async fn connect(&self) -> Result<Arc<BackendClient>, FocusdeskError> {
        let server = &self.config.server;
        let client = BackendClient::from_config(server)?;

        match (&server.email, &server.password) {
            (Some(email), Some(password)) => {
                client
                    .login(&Credentials {
                        email: email.clone(),
                        password: password.clone(),
                    })
                    .await?;
            }
            (Some(_), None) => {
                return Err(FocusdeskError::UserInput(
                    "A password is required to log in; set FOCUSDESK_PASSWORD or pass --password"
                        .to_string(),
                ));
            }
            (None, _) => debug!(base_url = %server.base_url, "No credentials configured, skipping login"),
        }

        Ok(Arc::new(client))
    }
}
