//! Config file commands.

use super::Context;
use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::Config;
use crate::error::FocusdeskError;
use crate::output::{format_done, to_json};

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config file cannot be written or serialized.
pub fn config(ctx: &Context, cmd: ConfigCommands) -> Result<String, FocusdeskError> {
    match cmd {
        ConfigCommands::Path => Ok(ctx.paths.config_file.display().to_string()),

        ConfigCommands::Show => {
            // Never echo the password back
            let mut shown = ctx.config.clone();
            shown.server.password = None;
            match ctx.format {
                OutputFormat::Json => to_json(&shown),
                OutputFormat::Pretty => serde_yaml::to_string(&shown)
                    .map(|yaml| yaml.trim_end().to_string())
                    .map_err(|e| FocusdeskError::Config(format!("Failed to serialize config: {e}"))),
            }
        }

        ConfigCommands::Init { force } => {
            let path = &ctx.paths.config_file;
            if path.exists() && !force {
                return Err(FocusdeskError::UserInput(format!(
                    "{} already exists; pass --force to overwrite it",
                    path.display()
                )));
            }
            ctx.paths.ensure_dirs()?;
            Config::default().save_to_path(path)?;
            Ok(format_done(&format!("Wrote {}", path.display())))
        }
    }
}
